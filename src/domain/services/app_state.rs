#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use ratatui::prelude::Rect;
use serde_json::Value;

use super::normalizer::reply_message;
use super::MessageList;
use super::Scroll;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::TransportError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Sending,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    Failed,
}

/// Keeps the prompt box disabled for as long as it is alive.
pub struct InputLock {
    input_enabled: Arc<AtomicBool>,
}

impl InputLock {
    fn acquire(input_enabled: &Arc<AtomicBool>) -> InputLock {
        input_enabled.store(false, Ordering::SeqCst);
        return InputLock {
            input_enabled: input_enabled.clone(),
        };
    }
}

impl Drop for InputLock {
    fn drop(&mut self) {
        self.input_enabled.store(true, Ordering::SeqCst);
    }
}

struct InFlight {
    placeholder_idx: usize,
    _lock: InputLock,
}

pub struct AppState {
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub message_list: MessageList,
    pub messages: Vec<Message>,
    pub scroll: Scroll,
    in_flight: Option<InFlight>,
    input_enabled: Arc<AtomicBool>,
    loading_text: String,
}

impl AppState {
    pub fn new(greeting: &str, loading_text: &str) -> AppState {
        let mut app_state = AppState {
            last_known_height: 0,
            last_known_width: 0,
            message_list: MessageList::new(),
            messages: vec![],
            scroll: Scroll::default(),
            in_flight: None,
            input_enabled: Arc::new(AtomicBool::new(true)),
            loading_text: loading_text.to_string(),
        };

        if !greeting.is_empty() {
            app_state.add_message(Message::new(Role::Assistant, greeting));
        }

        return app_state;
    }

    pub fn input_enabled(&self) -> bool {
        return self.input_enabled.load(Ordering::SeqCst);
    }

    pub fn submission_state(&self) -> SubmissionState {
        if self.in_flight.is_some() {
            return SubmissionState::Sending;
        }

        return SubmissionState::Idle;
    }

    /// Starts a round trip for `input`. Appends the user message and the
    /// loading placeholder, disables input, and returns the trimmed text that
    /// should be sent to the worker.
    ///
    /// Returns `None` without touching anything when the input is blank or a
    /// submission is already in flight.
    pub fn begin_submission(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        if self.in_flight.is_some() || !self.input_enabled() {
            tracing::warn!("Submission ignored while a request is in flight");
            return None;
        }

        self.add_message(Message::new(Role::User, text));

        let lock = InputLock::acquire(&self.input_enabled);
        let placeholder =
            Message::new_with_type(Role::Assistant, MessageType::Loading, &self.loading_text);
        self.add_message(placeholder);
        self.in_flight = Some(InFlight {
            placeholder_idx: self.messages.len() - 1,
            _lock: lock,
        });

        return Some(text.to_string());
    }

    /// Finishes the in-flight round trip with the worker's result. The
    /// placeholder is swapped for exactly one assistant message and input is
    /// enabled again on every path.
    pub fn complete_submission(
        &mut self,
        res: Result<Value, TransportError>,
    ) -> Option<SubmissionOutcome> {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) => in_flight,
            None => {
                tracing::warn!("Dropping worker response with no submission in flight");
                return None;
            }
        };

        if self
            .messages
            .get(in_flight.placeholder_idx)
            .map(|message| return message.is_loading())
            .unwrap_or(false)
        {
            self.messages.remove(in_flight.placeholder_idx);
        }

        let outcome = match res {
            Ok(_) => SubmissionOutcome::Success,
            Err(_) => SubmissionOutcome::Failed,
        };
        self.add_message(reply_message(&res));

        drop(in_flight);
        return Some(outcome);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    fn sync_dependants(&mut self) {
        self.message_list
            .set_messages(&self.messages, self.last_known_width);

        let list_length = u16::try_from(self.message_list.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(list_length, self.last_known_height);
    }
}
