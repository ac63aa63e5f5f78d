use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::GREETING_MESSAGE;
use crate::gateway::{DataRow, QueryResponse};
use crate::utils::GatewayError;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single turn within a conversation.
///
/// Messages are append-only: once constructed and added to a session
/// they are never mutated or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    /// Tabular excerpts attached to an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<DataRow>>,
    /// The query the backend generated to answer the question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Marks an assistant reply that reports a failure
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    /// Build a user question
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Local::now(),
            data: None,
            query: None,
            is_error: false,
        }
    }

    /// Build a plain assistant reply
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Local::now(),
            data: None,
            query: None,
            is_error: false,
        }
    }

    /// Build an assistant reply from a gateway response
    pub fn from_response(response: QueryResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: response.answer,
            timestamp: Local::now(),
            data: response.data,
            query: response.query_used,
            is_error: false,
        }
    }

    /// Build an error-flagged assistant reply from a gateway failure
    pub fn from_failure(error: &GatewayError) -> Self {
        Self {
            role: Role::Assistant,
            content: format!("Sorry, I encountered an error: {}", error.user_message()),
            timestamp: Local::now(),
            data: None,
            query: None,
            is_error: true,
        }
    }
}

/// One independent conversation thread with its own message history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Local>,
    pub messages: Vec<Message>,
}

impl Session {
    /// Create a session with a fresh unique id, seeded with the
    /// assistant greeting
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Local::now(),
            messages: vec![Message::assistant(GREETING_MESSAGE)],
        }
    }

    /// Short label for the session list: the first user question, or a
    /// placeholder while the session only holds the greeting
    pub fn title(&self) -> String {
        match self.messages.iter().find(|m| m.role == Role::User) {
            Some(msg) if msg.content.chars().count() > 40 => {
                let preview: String = msg.content.chars().take(40).collect();
                format!("{}...", preview)
            }
            Some(msg) => msg.content.clone(),
            None => "New chat".to_string(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
