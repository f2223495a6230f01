#[cfg(test)]
#[path = "message_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;

// Left margin plus the scrollbar column on the right.
const LINE_BORDER_WIDTH: u16 = 3;

struct MessageCacheEntry {
    role: Role,
    mtype: MessageType,
    text_len: usize,
    lines: Vec<Line<'static>>,
}

impl MessageCacheEntry {
    fn matches(&self, message: &Message) -> bool {
        return self.role == message.role
            && self.mtype == message.message_type()
            && self.text_len == message.text.len();
    }
}

fn header_style(message: &Message) -> Style {
    let colour = match message.role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Green,
    };

    return Style::default().fg(colour).add_modifier(Modifier::BOLD);
}

fn text_style(message: &Message) -> Style {
    match message.message_type() {
        MessageType::Normal => return Style::default(),
        MessageType::Error => return Style::default().fg(Color::Red),
        MessageType::Loading => {
            return Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC);
        }
    }
}

fn aligned_line(message: &Message, text: String, style: Style, line_width: u16) -> Line<'static> {
    let mut spans = vec![];
    if message.role == Role::User {
        let padding = (line_width as usize)
            .saturating_sub(LINE_BORDER_WIDTH as usize)
            .saturating_sub(text.chars().count());
        spans.push(Span::raw(" ".repeat(padding)));
    } else {
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(text, style));

    return Line::from(spans);
}

/// Lays out a single message: a role header, the wrapped text and a blank
/// separator. User messages are right aligned.
pub fn message_lines(message: &Message, line_width: u16) -> Vec<Line<'static>> {
    let text_width = line_width.saturating_sub(LINE_BORDER_WIDTH);
    let mut lines = vec![aligned_line(
        message,
        message.role.display_name(),
        header_style(message),
        line_width,
    )];

    let style = text_style(message);
    for line in message.as_string_lines(text_width as usize) {
        lines.push(aligned_line(message, line, style, line_width));
    }

    lines.push(Line::from(""));
    return lines;
}

/// Rendered lines of the whole chat, cached per message index.
#[derive(Default)]
pub struct MessageList {
    cache: HashMap<usize, MessageCacheEntry>,
    line_width: u16,
    lines_len: usize,
}

impl MessageList {
    pub fn new() -> MessageList {
        return MessageList {
            cache: HashMap::new(),
            line_width: 0,
            lines_len: 0,
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: u16) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        // The loading placeholder is removed once a reply lands.
        self.cache.retain(|idx, _| return *idx < messages.len());

        self.lines_len = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(cache_entry) = self.cache.get(&idx) {
                    if cache_entry.matches(message) {
                        return cache_entry.lines.len();
                    }
                }

                let lines = message_lines(message, line_width);
                let lines_len = lines.len();
                self.cache.insert(
                    idx,
                    MessageCacheEntry {
                        role: message.role,
                        mtype: message.message_type(),
                        text_len: message.text.len(),
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();
        let lines: Vec<Line<'static>> = indexes
            .iter()
            .filter_map(|idx| return self.cache.get(idx))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
