//! Per-client conversation state.

use tracing::{info, warn};

use crate::api::ChatMessage;
use crate::core::completion::CompletionBackend;
use crate::core::constants::{CANNED_REPLIES, DEFAULT_CONTEXT_WARN_THRESHOLD, SYSTEM_PROMPT};
use crate::core::message::Message;
use crate::core::reply::{self, Reply};

/// One client's conversation: the displayed transcript, the context sent to
/// the remote model, and the number of completed turns.
///
/// Sessions share nothing; each front end owns one and passes it by `&mut`.
pub struct ChatSession {
    transcript: Vec<Message>,
    context: Vec<ChatMessage>,
    message_count: usize,
    context_warn_threshold: usize,
    next_context_warning: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_context_warn_threshold(DEFAULT_CONTEXT_WARN_THRESHOLD)
    }

    pub fn with_context_warn_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            transcript: Vec::new(),
            context: vec![ChatMessage::system(SYSTEM_PROMPT)],
            message_count: 0,
            context_warn_threshold: threshold,
            next_context_warning: threshold,
        }
    }

    /// Run one turn: record the input, resolve the reply, record the reply.
    ///
    /// Never fails; remote failures come back as the reply text.
    pub async fn submit(&mut self, input: &str, backend: &dyn CompletionBackend) -> Reply {
        let pending = self.begin_turn(input);
        self.complete_pending(pending, backend).await
    }

    /// Add the user's entry without resolving a reply yet, so a front end can
    /// redraw before a slow remote call. Must be followed by [`Self::complete_pending`].
    pub fn begin_turn(&mut self, input: &str) -> PendingTurn {
        self.transcript.push(Message::user(input));
        PendingTurn {
            input: input.to_string(),
        }
    }

    /// Finish a turn started with [`Self::begin_turn`].
    pub async fn complete_pending(
        &mut self,
        pending: PendingTurn,
        backend: &dyn CompletionBackend,
    ) -> Reply {
        let reply =
            reply::resolve(self.message_count, &pending.input, &mut self.context, backend).await;

        self.message_count += 1;
        self.transcript.push(Message::assistant(reply.text.clone()));
        info!(
            turn = self.message_count,
            source = ?reply.source,
            context_len = self.context.len(),
            "turn completed"
        );
        self.check_context_growth();
        reply
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn context(&self) -> &[ChatMessage] {
        &self.context
    }

    /// Completed turns so far.
    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Whether the next turn will go to the remote model.
    pub fn is_live(&self) -> bool {
        self.message_count >= CANNED_REPLIES.len()
    }

    // The context is never trimmed; long sessions only get a warning each
    // time the length passes another multiple of the threshold.
    fn check_context_growth(&mut self) {
        if self.context.len() >= self.next_context_warning {
            warn!(
                context_len = self.context.len(),
                threshold = self.context_warn_threshold,
                "conversation context keeps growing; every live request resends all of it"
            );
            while self.next_context_warning <= self.context.len() {
                self.next_context_warning += self.context_warn_threshold;
            }
        }
    }
}

/// A turn whose user entry is recorded but whose reply is still outstanding.
#[must_use = "a pending turn must be completed to keep the transcript paired"]
pub struct PendingTurn {
    input: String,
}

impl PendingTurn {
    pub fn input(&self) -> &str {
        &self.input
    }
}
