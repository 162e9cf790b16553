use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::common::{ChatReply, ChatRequest};

use super::ExchangeError;

pub const CHAT_PATH: &str = "/chat";

/// One request/response exchange with the chat backend.
///
/// The returned future owns everything it needs so it can be spawned and
/// outlive the transport handle. It is awaited exactly once: no retry, no
/// timeout, no cancellation.
pub trait ChatTransport: Send + Sync + 'static {
    fn send(&self, request: ChatRequest) -> BoxFuture<'static, Result<ChatReply, ExchangeError>>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    pub fn with_client(client: reqwest::Client, server_url: &str) -> Self {
        let endpoint = format!("{}{CHAT_PATH}", server_url.trim_end_matches('/'));
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpTransport {
    fn send(&self, request: ChatRequest) -> BoxFuture<'static, Result<ChatReply, ExchangeError>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        async move {
            // `.json()` sets `Content-Type: application/json`.
            let response = client.post(&endpoint).json(&request).send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            log::debug!("POST {endpoint} -> {status} ({} bytes)", body.len());

            // Status is not inspected: a 4xx/5xx with a JSON body still
            // carries the backend's `error` field.
            let value: Value = serde_json::from_slice(&body)?;
            // No field can be read off `null`; other scalars and arrays
            // simply lack `error`/`response`.
            if value.is_null() {
                return Err(ExchangeError::NullBody);
            }
            Ok(ChatReply::from_value(&value))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            message: "What is RAG?".to_string(),
            session_id: "1700000000000".to_string(),
        }
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let transport = HttpTransport::new("http://localhost:8080/");
        assert_eq!(transport.endpoint(), "http://localhost:8080/chat");
    }

    #[tokio::test]
    async fn posts_json_body_and_reads_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "message": "What is RAG?",
                "session_id": "1700000000000"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Hello!" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri());
        let reply = transport.send(request()).await.unwrap();

        assert_eq!(reply, ChatReply::Response("Hello!".to_string()));
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_an_application_reply() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "index unavailable" })),
            )
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri());
        let reply = transport.send(request()).await.unwrap();

        assert_eq!(reply, ChatReply::Error("index unavailable".to_string()));
    }

    #[tokio::test]
    async fn non_json_body_is_a_malformed_exchange() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri());
        let err = transport.send(request()).await.unwrap_err();

        assert!(matches!(err, ExchangeError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn null_body_is_a_failed_exchange() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri());
        let err = transport.send(request()).await.unwrap_err();

        assert!(matches!(err, ExchangeError::NullBody));
    }

    #[tokio::test]
    async fn array_body_is_an_empty_reply() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1, 2]"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri());
        let reply = transport.send(request()).await.unwrap();

        assert_eq!(reply, ChatReply::Empty);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:1");
        let err = transport.send(request()).await.unwrap_err();

        assert!(matches!(err, ExchangeError::Transport(_)));
    }
}
