use super::types::ChatRequest;

/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fire one `POST /chat`. Every command is an independent exchange;
    /// nothing is queued behind a request that is still in flight.
    SendChat(ChatRequest),
}
