#[cfg(test)]
#[path = "chat_request_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequestMessage {
    pub role: Role,
    pub content: String,
}

/// Body posted to the worker. Every request is stateless and only carries the
/// latest user input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatRequestMessage>,
}

impl ChatRequest {
    pub fn new(text: &str) -> ChatRequest {
        return ChatRequest {
            messages: vec![ChatRequestMessage {
                role: Role::User,
                content: text.to_string(),
            }],
        };
    }
}
