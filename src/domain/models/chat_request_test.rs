use anyhow::Result;

use super::ChatRequest;
use crate::domain::models::Role;

#[test]
fn it_builds_a_single_user_message() {
    let req = ChatRequest::new("What shampoo should I use?");

    assert_eq!(req.messages.len(), 1);
    assert_eq!(req.messages[0].role, Role::User);
    assert_eq!(req.messages[0].content, "What shampoo should I use?");
}

#[test]
fn it_serializes_to_the_worker_shape() -> Result<()> {
    let body = serde_json::to_string(&ChatRequest::new("hi"))?;
    insta::assert_snapshot!(body, @r###"{"messages":[{"role":"user","content":"hi"}]}"###);

    return Ok(());
}
