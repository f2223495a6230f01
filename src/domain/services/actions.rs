#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::TransportBox;

pub struct ActionsService {}

impl ActionsService {
    /// Runs worker requests in the background, one at a time and in the
    /// order they were submitted. Every request produces exactly one
    /// `Event::WorkerResponse`.
    pub async fn start(
        transport: TransportBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            match action {
                Action::WorkerRequest(text) => {
                    tracing::debug!(text = %text, "Sending worker request");
                    let res = transport.send(&text).await;
                    if let Err(err) = &res {
                        tracing::error!(error = %err, "Worker request failed");
                    }

                    tx.send(Event::WorkerResponse(res))?;
                }
            }
        }

        return Ok(());
    }
}
