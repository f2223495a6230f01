use anyhow::Result;
use serde_json::json;

use super::AppState;
use super::SubmissionOutcome;
use super::SubmissionState;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::TransportError;

impl Default for AppState {
    fn default() -> AppState {
        let mut app_state = AppState::new("Hello! How can I help you today?", "Thinking...");
        app_state.last_known_width = 100;
        app_state.last_known_height = 300;
        return app_state;
    }
}

fn http_500() -> TransportError {
    return TransportError::HttpStatus {
        status: 500,
        body: "server exploded".to_string(),
    };
}

#[test]
fn it_starts_idle_with_a_greeting() {
    let app_state = AppState::default();

    assert!(app_state.input_enabled());
    assert_eq!(app_state.submission_state(), SubmissionState::Idle);
    assert_eq!(app_state.messages.len(), 1);
    assert_eq!(app_state.messages[0].role, Role::Assistant);
    assert_eq!(app_state.messages[0].text, "Hello! How can I help you today?");
}

#[test]
fn it_skips_empty_greetings() {
    let app_state = AppState::new("", "Thinking...");
    assert!(app_state.messages.is_empty());
}

mod begin_submission {
    use super::*;

    #[test]
    fn it_ignores_blank_input() {
        let mut app_state = AppState::default();

        for input in ["", " ", "\n\t  \n"] {
            assert_eq!(app_state.begin_submission(input), None);
        }

        assert_eq!(app_state.messages.len(), 1);
        assert!(app_state.input_enabled());
        assert_eq!(app_state.submission_state(), SubmissionState::Idle);
    }

    #[test]
    fn it_appends_trimmed_user_message_and_placeholder() {
        let mut app_state = AppState::default();
        let text = app_state.begin_submission("  Which conditioner?  \n");

        assert_eq!(text, Some("Which conditioner?".to_string()));
        assert_eq!(app_state.messages.len(), 3);

        let user_message = &app_state.messages[1];
        assert_eq!(user_message.role, Role::User);
        assert_eq!(user_message.text, "Which conditioner?");

        let placeholder = &app_state.messages[2];
        assert_eq!(placeholder.role, Role::Assistant);
        assert_eq!(placeholder.message_type(), MessageType::Loading);
        assert_eq!(placeholder.text, "Thinking...");

        assert!(!app_state.input_enabled());
        assert_eq!(app_state.submission_state(), SubmissionState::Sending);
    }

    #[test]
    fn it_refuses_a_second_submission_while_sending() {
        let mut app_state = AppState::default();
        app_state.begin_submission("first");

        assert_eq!(app_state.begin_submission("second"), None);
        assert_eq!(app_state.messages.len(), 3);
    }
}

mod complete_submission {
    use super::*;

    #[test]
    fn it_appends_the_normalized_reply() {
        let mut app_state = AppState::default();
        app_state.begin_submission("hi");

        let outcome =
            app_state.complete_submission(Ok(json!({"choices": [{"message": {"content": "yo"}}]})));

        assert_eq!(outcome, Some(SubmissionOutcome::Success));
        assert_eq!(app_state.messages.len(), 3);

        let last_message = app_state.messages.last().unwrap();
        assert_eq!(last_message.role, Role::Assistant);
        assert_eq!(last_message.text, "yo");
        assert_eq!(last_message.message_type(), MessageType::Normal);
        assert!(app_state.messages.iter().all(|m| return !m.is_loading()));
    }

    #[test]
    fn it_appends_errors() {
        let mut app_state = AppState::default();
        app_state.begin_submission("hi");

        let outcome = app_state.complete_submission(Err(http_500()));

        assert_eq!(outcome, Some(SubmissionOutcome::Failed));
        let last_message = app_state.messages.last().unwrap();
        assert_eq!(last_message.role, Role::Assistant);
        assert_eq!(last_message.message_type(), MessageType::Error);
        assert_eq!(
            last_message.text,
            "Error: Worker responded 500: server exploded"
        );
    }

    #[test]
    fn it_reenables_input_after_success() {
        let mut app_state = AppState::default();
        app_state.begin_submission("hi");
        app_state.complete_submission(Ok(json!("hello")));

        assert!(app_state.input_enabled());
        assert_eq!(app_state.submission_state(), SubmissionState::Idle);
    }

    #[test]
    fn it_reenables_input_after_failure() {
        let mut app_state = AppState::default();
        app_state.begin_submission("hi");
        app_state.complete_submission(Err(TransportError::Network(
            "connection refused".to_string(),
        )));

        assert!(app_state.input_enabled());
        assert_eq!(app_state.submission_state(), SubmissionState::Idle);
        assert_eq!(
            app_state.messages.last().unwrap().text,
            "Error: connection refused"
        );
    }

    #[test]
    fn it_drops_responses_with_nothing_in_flight() {
        let mut app_state = AppState::default();
        let outcome = app_state.complete_submission(Ok(json!("stray")));

        assert_eq!(outcome, None);
        assert_eq!(app_state.messages.len(), 1);
        assert!(app_state.input_enabled());
    }

    #[test]
    fn it_reenables_input_when_dropped_mid_flight() {
        let mut app_state = AppState::default();
        app_state.begin_submission("hi");
        let input_enabled = app_state.input_enabled.clone();
        assert!(!input_enabled.load(std::sync::atomic::Ordering::SeqCst));

        drop(app_state);
        assert!(input_enabled.load(std::sync::atomic::Ordering::SeqCst));
    }
}

#[test]
fn it_pairs_every_submission_with_one_reply() -> Result<()> {
    let mut app_state = AppState::default();
    let replies = vec![
        Ok(json!("one")),
        Err(http_500()),
        Ok(json!({"foo": "bar"})),
    ];

    for (idx, res) in replies.into_iter().enumerate() {
        let input = format!("question {idx}");
        app_state.begin_submission(&input);
        app_state.complete_submission(res);
    }

    let roles = app_state
        .messages
        .iter()
        .map(|message| return message.role)
        .collect::<Vec<Role>>();
    assert_eq!(
        roles,
        vec![
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );

    let user_texts = app_state
        .messages
        .iter()
        .filter(|message| return message.role == Role::User)
        .map(|message| return message.text.to_string())
        .collect::<Vec<String>>();
    assert_eq!(user_texts, vec!["question 0", "question 1", "question 2"]);

    return Ok(());
}

#[test]
fn it_scrolls_to_the_latest_message() {
    let mut app_state = AppState::default();
    app_state.last_known_height = 4;
    for idx in 0..5 {
        app_state.add_message(Message::new(Role::Assistant, &format!("message {idx}")));
    }

    let total = app_state.message_list.len() as u16;
    assert_eq!(app_state.scroll.position, total - 4);
}

#[test]
fn it_caps_the_scroll_length_for_huge_replies() {
    let mut app_state = AppState::default();
    app_state.last_known_height = 10;
    app_state.add_message(Message::new(Role::Assistant, &"line\n".repeat(70_000)));

    assert!(app_state.message_list.len() > u16::MAX as usize);
    assert_eq!(app_state.scroll.position, u16::MAX - 10);
}
