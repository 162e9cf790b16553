use eframe::egui;

use crate::controller::{ChatController, WidgetState};
use crate::diagnostics::DiagnosticKind;
use crate::ui::view::ChatContainer;

pub fn render(ui: &mut egui::Ui, controller: &ChatController, container: &ChatContainer) {
    ui.heading("Debug Info");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Session:");
        match controller.current_session_id() {
            Some(session_id) => ui.monospace(session_id),
            None => ui.label(egui::RichText::new("(not started)").weak()),
        };
    });

    ui.horizontal(|ui| {
        ui.label("State:");
        match controller.state() {
            WidgetState::Idle => ui.label("idle"),
            WidgetState::AwaitingResponse { in_flight } => {
                ui.colored_label(egui::Color32::YELLOW, format!("awaiting {in_flight} response(s)"))
            }
        };
    });

    ui.horizontal(|ui| {
        ui.label("Messages:");
        ui.label(container.len().to_string());
    });

    ui.horizontal(|ui| {
        ui.label("Scroll:");
        let position = format!(
            "{:.0} / {:.0}",
            container.scroll_top(),
            container.max_scroll_offset()
        );
        if container.is_at_bottom() {
            ui.label(position);
        } else {
            ui.colored_label(egui::Color32::LIGHT_BLUE, position);
        }
    });

    ui.separator();

    // Hiển thị log lỗi gần đây
    let diagnostics = controller.diagnostics();
    ui.label(format!("Recent Errors ({}):", diagnostics.len()));
    if diagnostics.is_empty() {
        ui.label(egui::RichText::new("None").weak());
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("diagnostics")
        .max_height(300.0)
        .show(ui, |ui| {
            for event in diagnostics.events().rev().take(20) {
                let time_str = event.timestamp.format("%H:%M:%S");
                let color = match event.kind {
                    DiagnosticKind::ApplicationError => egui::Color32::YELLOW,
                    DiagnosticKind::TransportError => egui::Color32::RED,
                    DiagnosticKind::StoreError => egui::Color32::GRAY,
                };

                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(color, format!("[{}] {}", time_str, event.kind));
                    ui.label(&event.message);
                });
            }
        });
}
