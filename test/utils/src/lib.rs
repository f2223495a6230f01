/// The envelope most OpenAI-compatible proxies answer with.
pub fn chat_completion_fixture() -> &'static str {
    return r#"
{
  "id": "chatcmpl-8JX2",
  "object": "chat.completion",
  "choices": [
    {
      "index": 0,
      "message": {
        "role": "assistant",
        "content": "Hello! For dry hair, try a nourishing mask once a week."
      },
      "finish_reason": "stop"
    }
  ]
}
"#
    .trim();
}

pub fn long_text_fixture() -> &'static str {
    return r#"
Here are a few things to try.

A leave-in conditioner after every wash keeps the ends from drying out, and a wide tooth comb avoids breakage while the hair is still wet.
	Rinse with cool water.

That's it!
"#
    .trim();
}
