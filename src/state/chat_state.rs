// src/state/chat_state.rs
use chrono::{DateTime, Local};

use crate::api::{ApiError, ChatRequest};

pub const GREETING: &str = "Hello! I am ready to answer questions about the uploaded X-ray.";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't connect to the server. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub sent_at: DateTime<Local>,
}

// A question ready to go out, tagged with the session it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChat {
    pub generation: u64,
    pub request: ChatRequest,
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
    typing: bool,
    generation: u64,
    pub input: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let mut session = Self {
            messages: Vec::new(),
            next_id: 1,
            typing: false,
            generation: 0,
            input: String::new(),
        };
        session.push(GREETING.to_string(), Sender::Ai);
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Sends whatever is in the input box.
    pub fn submit_input(&mut self, context: &str) -> Option<PendingChat> {
        let question = std::mem::take(&mut self.input);
        let pending = self.submit(&question, context);
        if pending.is_none() {
            self.input = question;
        }
        pending
    }

    /// Appends the user's question and marks the session as waiting.
    ///
    /// Returns `None` for blank questions and while a reply is outstanding.
    pub fn submit(&mut self, question: &str, context: &str) -> Option<PendingChat> {
        if question.trim().is_empty() || self.typing {
            return None;
        }

        self.push(question.to_string(), Sender::User);
        self.typing = true;

        Some(PendingChat {
            generation: self.generation,
            request: ChatRequest {
                question: question.to_string(),
                context: context.to_string(),
            },
        })
    }

    /// Records the outcome of a chat request. Replies addressed to an
    /// earlier session are dropped and `false` is returned.
    pub fn receive(&mut self, generation: u64, outcome: Result<String, ApiError>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding reply for a previous chat session");
            return false;
        }

        let text = match outcome {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.push(text, Sender::Ai);
        self.typing = false;
        true
    }

    pub fn reset_session(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new();
        self.generation = generation;
    }

    fn push(&mut self, text: String, sender: Sender) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text,
            sender,
            sent_at: Local::now(),
        });
        self.next_id += 1;
    }
}
