#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;

use async_trait::async_trait;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatRequest;
use crate::domain::models::Transport;
use crate::domain::models::TransportError;

fn convert_err(err: reqwest::Error) -> TransportError {
    return TransportError::Network(err.to_string());
}

/// Client for the HTTP worker that proxies chat completions.
pub struct Worker {
    url: String,
}

impl Default for Worker {
    fn default() -> Worker {
        return Worker {
            url: Config::get(ConfigKey::WorkerURL),
        };
    }
}

#[async_trait]
impl Transport for Worker {
    #[allow(clippy::implicit_return)]
    async fn send(&self, text: &str) -> Result<Value, TransportError> {
        let req = ChatRequest::new(text);

        let res = reqwest::Client::new()
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(convert_err)?;

        let status = res.status();
        let body = res.text().await.map_err(convert_err)?;

        if !status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                body = %body,
                "Worker responded with a failure status"
            );
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let data = serde_json::from_str::<Value>(&body)?;
        tracing::debug!(body = ?data, "Worker response");

        return Ok(data);
    }
}
