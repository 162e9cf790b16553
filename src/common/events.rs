use crate::network::ExchangeError;

use super::types::ChatReply;

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug)]
pub enum NetworkEvent {
    ExchangeCompleted(Result<ChatReply, ExchangeError>),
}
