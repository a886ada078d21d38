use serde::{Deserialize, Serialize};

pub const ROLE_SYSTEM: &str = "system";

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }
}

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
}

#[derive(Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the provider sent one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// Pull a one-line summary out of a provider error body.
///
/// Providers disagree on shape: OpenAI nests `error.message`, some proxies
/// send `error` as a bare string, others use a top-level `message`.
pub fn error_summary(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()))?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_openai_shape() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::new("user", "loan rates?"),
        ];
        let request = ChatRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.5,
        };

        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "loan rates?"}
                ],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn first_content_reads_first_choice() {
        let raw = r#"{"choices":[{"message":{"content":" Hello there "}},{"message":{"content":"second"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_content(), Some(" Hello there "));
    }

    #[test]
    fn first_content_is_none_without_choices() {
        let response: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_content(), None);

        let null_content: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null_content.first_content(), None);
    }

    #[test]
    fn error_summary_handles_common_shapes() {
        assert_eq!(
            error_summary(r#"{"error":{"message":"Rate limit   reached","type":"requests"}}"#),
            Some("Rate limit reached".to_string())
        );
        assert_eq!(
            error_summary(r#"{"error":"bad key"}"#),
            Some("bad key".to_string())
        );
        assert_eq!(
            error_summary(r#"{"message":"overloaded"}"#),
            Some("overloaded".to_string())
        );
        assert_eq!(error_summary(r#"{"status":"failed"}"#), None);
        assert_eq!(error_summary("<html>502</html>"), None);
    }
}
