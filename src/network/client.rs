use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent};

use super::ChatTransport;

/// Background side of the widget: turns commands from the UI into exchanges
/// and reports each completion back as an event.
pub struct ChatClient {
    transport: Box<dyn ChatTransport>,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
}

impl ChatClient {
    pub fn new(
        transport: Box<dyn ChatTransport>,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        Self {
            transport,
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) {
        log::info!("Network event loop started");

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command);
        }

        log::info!("Command channel closed; network event loop stopped");
    }

    fn handle_command(&self, command: NetworkCommand) {
        match command {
            NetworkCommand::SendChat(request) => {
                log::debug!("Sending chat message for session {}", request.session_id);
                let exchange = self.transport.send(request);
                let event_sender = self.event_sender.clone();

                // Mỗi request chạy độc lập, có thể hoàn thành không theo thứ tự gửi.
                tokio::spawn(async move {
                    let outcome = exchange.await;
                    if let Err(err) = event_sender
                        .send(NetworkEvent::ExchangeCompleted(outcome))
                        .await
                    {
                        log::warn!("Failed to notify UI about chat reply: {err}");
                    }
                });
            }
        }
    }
}
