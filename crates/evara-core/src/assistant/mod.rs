//! Canned planning assistant.
//!
//! Answers are picked by keyword from a fixed set of texts; nothing leaves
//! the process. [`AssistantSession`] adds the conversation around it: the
//! greeting, a short "typing" pause, and the reply arriving later.

mod responses;

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::DEFAULT_REPLY_DELAY_MS;

pub use responses::{GREETING, SUGGESTED_QUESTIONS};

/// Keyword groups checked in order; the first group with a hit decides the reply.
const TOPICS: [(&[&str], &str); 7] = [
    (&["theme", "style"], responses::THEMES),
    (&["timeline", "schedule"], responses::TIMELINE),
    (&["vendor", "book"], responses::VENDORS),
    (&["budget"], responses::BUDGET),
    (&["venue", "location"], responses::VENUE),
    (&["unique", "creative", "different"], responses::UNIQUE_IDEAS),
    (&["guest", "rsvp"], responses::GUEST_LIST),
];

/// Pick the canned reply for `message`.
///
/// Matching is a case-insensitive substring test, so "booking" counts as
/// "book".
///
/// # Examples
///
/// ```
/// use evara_core::assistant::respond;
///
/// assert!(respond("What VENUE should I pick?").starts_with("Choosing the perfect venue"));
/// ```
pub fn respond(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    TOPICS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(*keyword)))
        .map_or(responses::FALLBACK, |(_, reply)| *reply)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
}

struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
    pending_replies: usize,
}

impl Conversation {
    fn push(&mut self, role: Role, content: String) {
        self.messages.push(Message {
            id: self.next_id,
            role,
            content,
        });
        self.next_id += 1;
    }
}

struct Shared {
    conversation: Mutex<Conversation>,
    revision: watch::Sender<u64>,
}

impl Shared {
    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

/// One conversation with the assistant.
///
/// Replies are scheduled on the current Tokio runtime. Dropping or closing
/// the session cancels any reply still waiting.
pub struct AssistantSession {
    shared: Arc<Shared>,
    reply_delay: Duration,
    replies: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for AssistantSession {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REPLY_DELAY_MS))
    }
}

impl AssistantSession {
    /// Start a conversation that opens with [`GREETING`].
    pub fn new(reply_delay: Duration) -> Self {
        let mut conversation = Conversation {
            messages: Vec::new(),
            next_id: 1,
            pending_replies: 0,
        };
        conversation.push(Role::Assistant, GREETING.to_string());
        let (revision, _) = watch::channel(0);

        Self {
            shared: Arc::new(Shared {
                conversation: Mutex::new(conversation),
                revision,
            }),
            reply_delay,
            replies: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.shared.conversation.lock().messages.clone()
    }

    /// True while at least one reply is pending
    pub fn is_typing(&self) -> bool {
        self.shared.conversation.lock().pending_replies > 0
    }

    /// Suggestions are only offered until the user has said something
    pub fn suggested_questions(&self) -> &'static [&'static str] {
        let conversation = self.shared.conversation.lock();
        if conversation.messages.iter().any(|m| m.role == Role::User) {
            &[]
        } else {
            &SUGGESTED_QUESTIONS
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Post a user message and schedule the reply.
    ///
    /// Blank input is ignored and returns `false`.
    pub fn send(&self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }

        let reply = respond(input);
        {
            let mut conversation = self.shared.conversation.lock();
            conversation.push(Role::User, input.to_string());
            conversation.pending_replies += 1;
        }
        self.shared.notify();

        let shared = Arc::downgrade(&self.shared);
        let delay = self.reply_delay;
        let handle = tokio::spawn(deliver_reply(shared, delay, reply));

        let mut replies = self.replies.lock();
        replies.retain(|handle| !handle.is_finished());
        replies.push(handle);
        true
    }

    /// Wait until no reply is pending.
    pub async fn wait_idle(&self) {
        let mut revisions = self.subscribe();
        while self.is_typing() {
            if revisions.changed().await.is_err() {
                break;
            }
        }
    }

    /// Cancel pending replies and clear the typing flag.
    pub fn close(&self) {
        let cancelled = self.abort_replies();
        if cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled pending assistant replies");
        }
        self.shared.conversation.lock().pending_replies = 0;
        self.shared.notify();
    }

    fn abort_replies(&self) -> usize {
        let mut replies = self.replies.lock();
        let cancelled = replies.iter().filter(|handle| !handle.is_finished()).count();
        for handle in replies.drain(..) {
            handle.abort();
        }
        cancelled
    }
}

impl Drop for AssistantSession {
    fn drop(&mut self) {
        self.abort_replies();
    }
}

async fn deliver_reply(shared: Weak<Shared>, delay: Duration, reply: &'static str) {
    tokio::time::sleep(delay).await;
    // The session may be gone by now
    let Some(shared) = shared.upgrade() else {
        return;
    };
    {
        let mut conversation = shared.conversation.lock();
        conversation.push(Role::Assistant, reply.to_string());
        conversation.pending_replies = conversation.pending_replies.saturating_sub(1);
    }
    shared.notify();
}
