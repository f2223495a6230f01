use super::message_lines;
use super::MessageList;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;

fn line_text(message: &Message, width: u16) -> Vec<String> {
    return message_lines(message, width)
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| return span.content.to_string())
                .collect::<String>();
        })
        .collect();
}

#[test]
fn it_has_no_cached_lines() {
    let message_list = MessageList::new();

    assert_eq!(message_list.cache.len(), 0);
    assert_eq!(message_list.len(), 0);
}

#[test]
fn it_caches_lines() {
    let messages = vec![
        Message::new(Role::Assistant, "Hi there!"),
        Message::new(Role::User, "Hello"),
    ];

    let mut message_list = MessageList::new();
    message_list.set_messages(&messages, 50);

    assert_eq!(message_list.cache.len(), 2);
    assert_eq!(message_list.len(), 6);
}

#[test]
fn it_drops_removed_placeholders() {
    let mut messages = vec![
        Message::new(Role::User, "Hello"),
        Message::new_with_type(Role::Assistant, MessageType::Loading, "Thinking..."),
    ];

    let mut message_list = MessageList::new();
    message_list.set_messages(&messages, 50);
    assert_eq!(message_list.cache.len(), 2);

    messages.pop();
    message_list.set_messages(&messages, 50);
    assert_eq!(message_list.cache.len(), 1);
    assert_eq!(message_list.len(), 3);
}

#[test]
fn it_rerenders_replaced_messages() {
    let mut messages = vec![Message::new_with_type(
        Role::Assistant,
        MessageType::Loading,
        "Thinking...",
    )];

    let mut message_list = MessageList::new();
    message_list.set_messages(&messages, 50);

    messages[0] = Message::new(Role::Assistant, "Line one\nLine two");
    message_list.set_messages(&messages, 50);

    assert_eq!(message_list.cache[&0].mtype, MessageType::Normal);
    assert_eq!(message_list.len(), 4);
}

#[test]
fn it_clears_the_cache_on_resize() {
    let messages = vec![Message::new(
        Role::Assistant,
        "one two three four five six seven eight nine ten",
    )];

    let mut message_list = MessageList::new();
    message_list.set_messages(&messages, 100);
    assert_eq!(message_list.len(), 3);

    message_list.set_messages(&messages, 20);
    assert_eq!(message_list.line_width, 20);
    assert_eq!(message_list.len(), 6);
}

#[test]
fn it_right_aligns_user_messages() {
    let lines = line_text(&Message::new(Role::User, "Hello"), 20);

    assert_eq!(lines[1], format!("{}Hello", " ".repeat(12)));
    assert_eq!(lines[2], "");
}

#[test]
fn it_left_aligns_assistant_messages() {
    let lines = line_text(&Message::new(Role::Assistant, "Hello"), 20);

    assert_eq!(lines[0], " Assistant");
    assert_eq!(lines[1], " Hello");
}
