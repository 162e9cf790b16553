mod client;
mod transport;

pub use client::ChatClient;
pub use transport::{ChatTransport, HttpTransport};

/// A request that never produced a usable JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("request to chat backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat backend returned a body that is not JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("chat backend returned a JSON null body")]
    NullBody,
    #[error("network worker unavailable: {0}")]
    WorkerUnavailable(String),
}
