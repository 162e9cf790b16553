use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent};
use crate::controller::ChatController;
use crate::network::ExchangeError;

use super::components::{chat_area, debug_panel, input_bar};
use super::state::AppState;

pub struct ChatApp {
    title: String,
    state: AppState,
    controller: ChatController,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        title: String,
        controller: ChatController,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        Self {
            title,
            state: AppState::new(),
            controller,
            command_sender,
            event_receiver,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                NetworkEvent::ExchangeCompleted(outcome) => {
                    self.controller.apply(outcome, &mut self.state.container)
                }
            }
        }
    }

    fn submit(&mut self) {
        let Some(request) = self
            .controller
            .submit(&mut self.state.input_text, &mut self.state.container)
        else {
            return;
        };

        if let Err(err) = self
            .command_sender
            .try_send(NetworkCommand::SendChat(request))
        {
            log::warn!("Failed to send command to network: {err}");
            self.controller.apply(
                Err(ExchangeError::WorkerUnavailable(err.to_string())),
                &mut self.state.container,
            );
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        egui::SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                debug_panel::render(ui, &self.controller, &self.state.container);
            });

        egui::TopBottomPanel::bottom("chat-form").show(ctx, |ui| {
            ui.add_space(6.0);
            if input_bar::render(ui, &mut self.state.input_text) {
                self.submit();
            }
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.title.as_str());
            ui.separator();
            chat_area::render(ui, &mut self.state.container);
        });

        ctx.request_repaint();
    }
}
