//! Chat widget state: append-only message history plus request bookkeeping.
//!
//! `send` hands back a `ChatRequest` for the caller to dispatch; `resolve`
//! appends the reply. Replies land in completion order, so two overlapping
//! sends can answer out of order.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc::UnboundedSender;

use crate::content::EXAMPLE_PROMPTS;
use crate::gemini::Completer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub id: u64,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ChatWidget {
    messages: Vec<ChatMessage>,
    pub input: String,
    pub open: bool,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll: usize,
    /// Highlighted example prompt while the transcript is empty.
    pub prompt_cursor: usize,
    in_flight: usize,
    next_id: u64,
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while any request is waiting on the completer.
    pub fn is_typing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Append the user's text and open a request. Blank text is ignored and
    /// leaves the input untouched.
    pub fn send(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() {
            return None;
        }
        self.input.clear();
        self.messages.push(ChatMessage::new(Role::User, text));
        self.in_flight += 1;
        self.scroll = 0;
        self.next_id += 1;
        Some(ChatRequest {
            id: self.next_id,
            prompt: text.to_string(),
        })
    }

    pub fn submit_input(&mut self) -> Option<ChatRequest> {
        let text = self.input.clone();
        self.send(&text)
    }

    /// Send the highlighted example prompt.
    pub fn send_example(&mut self) -> Option<ChatRequest> {
        let prompt = EXAMPLE_PROMPTS.get(self.prompt_cursor)?;
        self.send(prompt)
    }

    pub fn next_example(&mut self) {
        self.prompt_cursor = (self.prompt_cursor + 1) % EXAMPLE_PROMPTS.len();
    }

    pub fn prev_example(&mut self) {
        self.prompt_cursor = (self.prompt_cursor + EXAMPLE_PROMPTS.len() - 1) % EXAMPLE_PROMPTS.len();
    }

    /// Append the assistant reply for a finished request.
    pub fn resolve(&mut self, reply: ChatReply) {
        self.messages.push(ChatMessage::new(Role::Assistant, reply.text));
        self.in_flight = self.in_flight.saturating_sub(1);
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}

/// Run `request` on the current tokio runtime and post the reply to `tx`.
pub fn dispatch(
    completer: Arc<dyn Completer>,
    request: ChatRequest,
    tx: UnboundedSender<ChatReply>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let text = completer.complete(request.prompt).await;
        let _ = tx.send(ChatReply {
            id: request.id,
            text,
        });
    })
}
