use crate::api::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptRole {
    User,
    Assistant,
}

/// One displayed entry of the session transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
}

impl TranscriptRole {
    /// Role name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }

    /// Label shown in front of the entry when rendering the transcript.
    pub fn display_label(self) -> &'static str {
        match self {
            TranscriptRole::User => "You",
            TranscriptRole::Assistant => "Assistant",
        }
    }
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Assistant, content)
    }

    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::new(self.role.as_str(), self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_uses_api_role_names() {
        let message = Message::assistant("Please Enter your Account number");
        let chat = message.to_chat_message();
        assert_eq!(chat.role, "assistant");
        assert_eq!(chat.content, "Please Enter your Account number");

        assert_eq!(Message::user("Hi").to_chat_message().role, "user");
    }

    #[test]
    fn labels_differ_from_wire_names() {
        assert_eq!(TranscriptRole::User.display_label(), "You");
        assert_eq!(TranscriptRole::Assistant.display_label(), "Assistant");
    }
}
