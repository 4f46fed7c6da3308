//! Push notifications via Pushover
//!
//! Delivery is best effort. Transport errors and rejected requests are
//! logged and swallowed; the caller never sees them.

use crate::config::PushoverConfig;
use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;

pub const PUSHOVER_ENDPOINT: &str = "https://api.pushover.net/1/messages.json";

/// Fire-and-forget sink for status messages
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str);
}

/// Reply body from the Pushover messages API
#[derive(Debug, Clone, Deserialize)]
struct PushoverReply {
    status: i64,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
enum NotifyError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rejected with HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

pub struct PushoverNotifier {
    config: PushoverConfig,
    endpoint: String,
}

impl PushoverNotifier {
    pub fn new(config: PushoverConfig) -> Self {
        Self {
            config,
            endpoint: PUSHOVER_ENDPOINT.to_string(),
        }
    }

    /// Point the notifier at a different messages URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn post(&self, message: &str) -> Result<PushoverReply, NotifyError> {
        let client = reqwest::Client::builder().build()?;
        let response = client
            .post(&self.endpoint)
            .form(&[
                ("token", self.config.api_token.as_str()),
                ("user", self.config.user_key.as_str()),
                ("message", message),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let reply = serde_json::from_str::<PushoverReply>(&body).ok();

        if !status.is_success() {
            let detail = reply
                .map(|r| r.errors.join("; "))
                .filter(|d| !d.is_empty())
                .unwrap_or(body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        match reply {
            // Pushover can refuse a message inside a 2xx reply
            Some(reply) if reply.status != 1 => Err(NotifyError::Rejected {
                status: status.as_u16(),
                detail: format!("status {}: {}", reply.status, reply.errors.join("; ")),
            }),
            Some(reply) => Ok(reply),
            None => Ok(PushoverReply {
                status: 1,
                request: None,
                errors: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, message: &str) {
        if !self.config.enabled {
            return;
        }

        debug!("Sending Pushover notification: {}", message);
        match self.post(message).await {
            Ok(reply) => debug!(
                "Pushover response status: {} (request {})",
                reply.status,
                reply.request.as_deref().unwrap_or("-")
            ),
            Err(e) => error!("Failed to send Pushover notification: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn config(enabled: bool) -> PushoverConfig {
        PushoverConfig {
            enabled,
            api_token: "app-token".into(),
            user_key: "user-key".into(),
        }
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Loopback server answering a single request with a canned reply
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}/1/messages.json", addr), handle)
    }

    #[tokio::test]
    async fn test_posts_form_body() {
        let (url, server) =
            one_shot_server("200 OK", r#"{"status":1,"request":"abc-123"}"#).await;
        let notifier = PushoverNotifier::new(config(true)).with_endpoint(url);

        notifier.send("Node 100 connected").await;

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /1/messages.json"));
        assert!(request
            .to_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.contains("token=app-token"));
        assert!(request.contains("user=user-key"));
        assert!(request.contains("message=Node+100+connected"));
    }

    #[tokio::test]
    async fn test_rejection_is_reported_then_swallowed() {
        let (url, server) = one_shot_server(
            "400 Bad Request",
            r#"{"user":"invalid","errors":["user identifier is invalid"],"status":0}"#,
        )
        .await;
        let notifier = PushoverNotifier::new(config(true)).with_endpoint(url);

        match notifier.post("hello").await {
            Err(NotifyError::Rejected { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail, "user identifier is invalid");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_status_in_2xx_is_rejection() {
        let (url, server) = one_shot_server(
            "200 OK",
            r#"{"status":0,"errors":["application token is invalid"]}"#,
        )
        .await;
        let notifier = PushoverNotifier::new(config(true)).with_endpoint(url);

        match notifier.post("hello").await {
            Err(NotifyError::Rejected { status, detail }) => {
                assert_eq!(status, 200);
                assert!(detail.contains("application token is invalid"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_accepted_reply_is_ok() {
        let (url, server) =
            one_shot_server("200 OK", r#"{"status":1,"request":"req-9"}"#).await;
        let notifier = PushoverNotifier::new(config(true)).with_endpoint(url);

        let reply = notifier.post("hello").await.unwrap();
        assert_eq!(reply.status, 1);
        assert_eq!(reply.request.as_deref(), Some("req-9"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_2xx_does_not_panic() {
        let (url, server) = one_shot_server("500 Internal Server Error", "oops").await;
        let notifier = PushoverNotifier::new(config(true)).with_endpoint(url);
        notifier.send("hello").await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_swallowed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = PushoverNotifier::new(config(true))
            .with_endpoint(format!("http://{}/1/messages.json", addr));
        notifier.send("nobody home").await;
    }

    #[tokio::test]
    async fn test_disabled_performs_no_io() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let notifier = PushoverNotifier::new(config(false))
            .with_endpoint(format!("http://{}/1/messages.json", addr));
        assert!(!notifier.is_enabled());

        for message in ["", "hello", "🚫 Blocked node 1"] {
            notifier.send(message).await;
        }

        let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "disabled notifier opened a connection");
    }

    #[test]
    fn test_default_endpoint() {
        let notifier = PushoverNotifier::new(config(true));
        assert_eq!(notifier.endpoint, PUSHOVER_ENDPOINT);
    }
}
