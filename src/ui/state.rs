use super::view::ChatContainer;

/// Trạng thái cục bộ của UI.
pub struct AppState {
    /// Value of the `user-input` field.
    pub input_text: String,
    /// The `chat-container` message list.
    pub container: ChatContainer,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            container: ChatContainer::new(),
        }
    }
}
