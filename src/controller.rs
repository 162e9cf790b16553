use chrono::Utc;
use uuid::Uuid;

use crate::common::{ChatMessage, ChatReply, ChatRequest, Sender};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::network::ExchangeError;
use crate::storage::{SessionStore, resolve_session_id};
use crate::ui::markup::RenderMode;
use crate::ui::view::{ChatContainer, MessageNode};

pub const APPLICATION_ERROR_TEXT: &str = "⚠️ Sorry, something went wrong.";
pub const NETWORK_ERROR_TEXT: &str = "⚠️ Network error. Please try again.";
pub const BOT_AVATAR_PATH: &str = "/static/assets/xaltanalytics_logo.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    AwaitingResponse { in_flight: usize },
}

/// Owns the submit → request → render contract of the widget.
///
/// The controller never awaits anything itself. `submit` does the
/// synchronous half and hands back the request to send; whoever performs the
/// exchange passes the outcome to `apply`. Several requests may be out at
/// once and their outcomes may come back in any order.
pub struct ChatController {
    store: Box<dyn SessionStore>,
    render_mode: RenderMode,
    avatar_src: String,
    clock: fn() -> i64,
    fallback_session: Option<String>,
    in_flight: usize,
    diagnostics: Diagnostics,
}

impl ChatController {
    pub fn new(store: Box<dyn SessionStore>, render_mode: RenderMode, avatar_src: String) -> Self {
        Self {
            store,
            render_mode,
            avatar_src,
            clock: || Utc::now().timestamp_millis(),
            fallback_session: None,
            in_flight: 0,
            diagnostics: Diagnostics::default(),
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Handle a form submission. Returns `None`, with nothing touched, when
    /// the trimmed input is empty.
    pub fn submit(
        &mut self,
        input: &mut String,
        container: &mut ChatContainer,
    ) -> Option<ChatRequest> {
        let message = input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        self.append_message(container, Sender::User, &message);
        input.clear();

        let session_id = self.session_id();
        self.in_flight += 1;
        Some(ChatRequest {
            message,
            session_id,
        })
    }

    /// Render the outcome of one exchange.
    pub fn apply(
        &mut self,
        outcome: Result<ChatReply, ExchangeError>,
        container: &mut ChatContainer,
    ) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Ok(ChatReply::Response(text)) => {
                self.append_message(container, Sender::Bot, &text);
            }
            Ok(ChatReply::Error(cause)) => {
                self.append_message(container, Sender::Bot, APPLICATION_ERROR_TEXT);
                self.diagnostics
                    .record(DiagnosticKind::ApplicationError, cause);
            }
            Ok(ChatReply::Empty) => {
                self.append_message(container, Sender::Bot, APPLICATION_ERROR_TEXT);
                self.diagnostics.record(
                    DiagnosticKind::ApplicationError,
                    "reply carried neither `response` nor `error`",
                );
            }
            Err(err) => {
                self.append_message(container, Sender::Bot, NETWORK_ERROR_TEXT);
                self.diagnostics
                    .record(DiagnosticKind::TransportError, err.to_string());
            }
        }
    }

    pub fn append_message(&self, container: &mut ChatContainer, sender: Sender, text: &str) {
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.to_string(),
            timestamp: Utc::now().timestamp(),
        };
        container.append(MessageNode::new(message, self.render_mode, &self.avatar_src));
    }

    pub fn state(&self) -> WidgetState {
        match self.in_flight {
            0 => WidgetState::Idle,
            in_flight => WidgetState::AwaitingResponse { in_flight },
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Session id currently in effect, without minting one.
    pub fn current_session_id(&self) -> Option<String> {
        match self.store.get(crate::storage::SESSION_KEY) {
            Ok(Some(id)) => Some(id),
            _ => self.fallback_session.clone(),
        }
    }

    fn session_id(&mut self) -> String {
        let clock = self.clock;
        match resolve_session_id(&mut *self.store, clock) {
            Ok(id) => id,
            Err(err) => {
                self.diagnostics.record(
                    DiagnosticKind::StoreError,
                    format!("session store unavailable, using in-memory id: {err}"),
                );
                self.fallback_session
                    .get_or_insert_with(|| clock().to_string())
                    .clone()
            }
        }
    }
}
