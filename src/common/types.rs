use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ai là người gửi tin nhắn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => f.write_str("user"),
            Sender::Bot => f.write_str("bot"),
        }
    }
}

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: i64,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

/// What the backend answered, once the body has been decoded as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    /// `response` field, rendered as the bot message.
    Response(String),
    /// Truthy `error` field. Only ever logged.
    Error(String),
    /// Valid JSON carrying neither a truthy `error` nor a usable `response`.
    Empty,
}

impl ChatReply {
    pub fn from_value(body: &Value) -> Self {
        if let Some(error) = body.get("error").filter(|value| is_truthy(value)) {
            let description = match error {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return ChatReply::Error(description);
        }

        match body.get("response") {
            None | Some(Value::Null) => ChatReply::Empty,
            Some(Value::String(text)) => ChatReply::Response(text.clone()),
            Some(other) => ChatReply::Response(other.to_string()),
        }
    }
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
