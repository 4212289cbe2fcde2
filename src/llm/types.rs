//! Chat-completion wire types and the normalized AI response.
//!
//! The request body is OpenAI-compatible:
//! `{model, messages:[system, user], temperature, max_tokens}`.
//! Only `choices[0].message.content` is read back.

use serde::{Deserialize, Serialize};

use super::client::AiError;

/// Request body for the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The parts of a chat-completion response we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if present and non-empty.
    pub fn first_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|t| !t.is_empty())
    }
}

/// Normalized outcome of one completion call.
///
/// Exactly one of `result` / `error` is set, matching `success`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable failure class ("missingCredential", "http", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl AiResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(text.into()),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(err: &AiError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind().to_string()),
        }
    }
}

impl From<Result<String, AiError>> for AiResponse {
    fn from(outcome: Result<String, AiError>) -> Self {
        match outcome {
            Ok(text) => AiResponse::ok(text),
            Err(e) => AiResponse::failed(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_text_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"X"}},{"message":{"content":"Y"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("X"));
    }

    #[test]
    fn first_text_rejects_missing_or_empty_content() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":""}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{}]}"#,
        ] {
            let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
            assert!(parsed.first_text().is_none(), "body: {}", body);
        }
    }

    #[test]
    fn response_sets_exactly_one_side() {
        let ok = AiResponse::from(Ok::<_, AiError>("done".to_string()));
        assert!(ok.success);
        assert_eq!(ok.result.as_deref(), Some("done"));
        assert!(ok.error.is_none());

        let failed = AiResponse::from(Err::<String, _>(AiError::MissingCredential));
        assert!(!failed.success);
        assert!(failed.result.is_none());
        assert_eq!(failed.error.as_deref(), Some("API key not configured"));
        assert_eq!(failed.error_kind.as_deref(), Some("missingCredential"));
    }
}
