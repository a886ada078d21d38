//! Decides what the assistant says for a turn.
//!
//! The opening turns are scripted from [`CANNED_REPLIES`]; every turn after
//! that goes to the remote model. Scripted turns never touch the remote
//! context, so the model only sees the conversation from the first live turn.

use tracing::{debug, warn};

use crate::api::ChatMessage;
use crate::core::completion::{CompletionBackend, CompletionError};
use crate::core::constants::CANNED_REPLIES;
use crate::core::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Canned,
    Remote,
    /// The remote call failed and the text is a diagnostic.
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// The scripted reply for a turn, if the session is still in the scripted phase.
pub fn canned_reply(turn: usize) -> Option<&'static str> {
    CANNED_REPLIES.get(turn).copied()
}

/// Text shown in place of a reply when the remote call fails.
pub fn failure_text(err: &CompletionError) -> String {
    match err.status_code() {
        Some(status) => format!(
            "Sorry, I encountered an API error: {status}. Please check your configuration."
        ),
        None => format!("An unexpected error occurred: {err}"),
    }
}

/// Resolve the reply for turn number `turn`.
///
/// Live turns append the user input and then the reply (or the failure
/// text) to `context`, keeping user/assistant alternation intact.
pub async fn resolve(
    turn: usize,
    user_input: &str,
    context: &mut Vec<ChatMessage>,
    backend: &dyn CompletionBackend,
) -> Reply {
    if let Some(text) = canned_reply(turn) {
        debug!(turn, "answering from the scripted replies");
        return Reply {
            text: text.to_string(),
            source: ReplySource::Canned,
        };
    }

    context.push(Message::user(user_input).to_chat_message());

    let reply = match backend.complete(context.as_slice()).await {
        Ok(content) => Reply {
            text: content.trim().to_string(),
            source: ReplySource::Remote,
        },
        Err(err) => {
            warn!(turn, error = %err, "remote reply failed");
            Reply {
                text: failure_text(&err),
                source: ReplySource::Failure,
            }
        }
    };

    context.push(Message::assistant(reply.text.clone()).to_chat_message());
    reply
}
