//! Message and MessageWindow domain types.
//!
//! A [`Message`] is a single conversation turn. A [`MessageWindow`] is the
//! bounded, ordered, evicting log of turns that a role carries between
//! invocations: append at the tail, evict at the head once the configured
//! capacity is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, rules)
    System,
    /// The end user
    User,
    /// The language model
    Assistant,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Position in the owning window's append order. Zero until the
    /// message is appended to a window.
    #[serde(default)]
    pub seq: u64,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            seq: 0,
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool result message answering the given tool call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::new(Role::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }
}

/// A tool call embedded in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// A bounded sliding window over conversation turns.
///
/// Holds at most `capacity` messages. Appending under capacity pressure
/// evicts from the head (FIFO), with one exception: a leading system
/// message is pinned and never evicted — the second-oldest message goes
/// instead. The `len() <= capacity` invariant holds unconditionally.
///
/// The window assigns each appended message a monotonically increasing
/// ordinal (`seq`), so relative order survives eviction and snapshots.
/// Messages are never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWindow {
    messages: VecDeque<Message>,
    capacity: usize,
    pin_system: bool,
    next_seq: u64,
}

impl MessageWindow {
    /// Default window capacity.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Create a window holding at most `capacity` messages, with the
    /// leading system message pinned.
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, true)
    }

    /// Create a window with an explicit system-pinning policy.
    pub fn with_policy(capacity: usize, pin_system: bool) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            pin_system,
            next_seq: 0,
        }
    }

    /// Append a message at the tail, evicting from the head if the window
    /// is full. Returns the ordinal assigned to the message.
    pub fn append(&mut self, mut message: Message) -> u64 {
        let seq = self.next_seq;
        message.seq = seq;
        self.next_seq += 1;

        if self.messages.len() == self.capacity {
            let pinned = self.pin_system
                && self.messages.front().map(|m| m.role) == Some(Role::System);
            if pinned && self.messages.len() > 1 {
                let _ = self.messages.remove(1);
            } else {
                self.messages.pop_front();
            }
        }

        self.messages.push_back(message);
        debug_assert!(self.messages.len() <= self.capacity);
        seq
    }

    /// A read-only snapshot of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// Number of messages currently held.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the window holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the leading system message is exempt from eviction.
    pub fn pins_system(&self) -> bool {
        self.pin_system
    }
}

impl Default for MessageWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
