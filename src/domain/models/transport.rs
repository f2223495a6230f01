use async_trait::async_trait;
use serde_json::Value;

/// Ways a single round trip to the worker can fail. The `Display` output of
/// each variant is what ends up in the chat after `Error: `.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Worker responded {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait Transport {
    /// Posts a single user message to the worker and returns the parsed JSON
    /// body. Called exactly once per submission, there are no retries.
    async fn send(&self, text: &str) -> Result<Value, TransportError>;
}

pub type TransportBox = Box<dyn Transport + Send + Sync>;
