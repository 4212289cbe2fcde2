//! Messaging bridge — typed request/response between the page side and
//! the privileged background handler.
//!
//! Every call is one `Request` in, one `Response` out. The background
//! dispatches purely on the request variant and never lets a platform
//! failure escape: it always answers `{success:false, ...}` instead.
//!
//! Transports:
//!   - local.rs   — in-process, with a JSON round trip per message
//!   - stdio.rs   — NDJSON serve loop for a separate host process
//!   - process.rs — client side of stdio.rs (spawns the host)

pub mod background;
pub mod local;
pub mod platform;
pub mod process;
pub mod stdio;

pub use background::Background;
pub use local::LocalBridge;
pub use platform::{BrowserPlatform, PlatformError, Tab};
pub use process::ProcessBridge;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::actions::AiAction;
use crate::config::{ConfigPatch, Configuration, StorageData};
use crate::llm::AiResponse;

// ── Requests ───────────────────────────────────────────────────────

/// Everything the page side may ask of the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    AiRequest(AiRequestPayload),
    GetTabs,
    /// Focus the tab with this id.
    SwitchTab(i64),
    NewTab,
    Screenshot,
    AddBookmark(BookmarkPayload),
    OpenUrl(String),
    OpenOptions,
    GetStorage,
    SaveConfig(ConfigPatch),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRequestPayload {
    pub action: AiAction,
    pub text: String,
    pub config: Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkPayload {
    pub title: String,
    pub url: String,
}

impl Request {
    /// Wire tag, for log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Request::AiRequest(_) => "AI_REQUEST",
            Request::GetTabs => "GET_TABS",
            Request::SwitchTab(_) => "SWITCH_TAB",
            Request::NewTab => "NEW_TAB",
            Request::Screenshot => "SCREENSHOT",
            Request::AddBookmark(_) => "ADD_BOOKMARK",
            Request::OpenUrl(_) => "OPEN_URL",
            Request::OpenOptions => "OPEN_OPTIONS",
            Request::GetStorage => "GET_STORAGE",
            Request::SaveConfig(_) => "SAVE_CONFIG",
        }
    }
}

// ── Responses ──────────────────────────────────────────────────────

/// `{success, ...}` plus whichever fields the request type fills in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<Tab>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StorageData>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_tabs(tabs: Vec<Tab>) -> Self {
        Self {
            tabs: Some(tabs),
            ..Self::ok()
        }
    }

    pub fn with_data_url(data_url: String) -> Self {
        Self {
            data_url: Some(data_url),
            ..Self::ok()
        }
    }

    pub fn with_data(data: StorageData) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }
}

impl From<AiResponse> for Response {
    fn from(ai: AiResponse) -> Self {
        Self {
            success: ai.success,
            result: ai.result,
            error: ai.error,
            error_kind: ai.error_kind,
            ..Self::default()
        }
    }
}

// ── Transport seam ─────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Bridge disconnected: {0}")]
    Disconnected(String),
    #[error("Bad message: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Send one request and wait for its response.
#[async_trait]
pub trait Bridge: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_tags_match_wire_protocol() {
        let cases = [
            (Request::GetTabs, json!({"type": "GET_TABS"})),
            (Request::SwitchTab(7), json!({"type": "SWITCH_TAB", "payload": 7})),
            (
                Request::OpenUrl("chrome://history".into()),
                json!({"type": "OPEN_URL", "payload": "chrome://history"}),
            ),
            (
                Request::AddBookmark(BookmarkPayload {
                    title: "T".into(),
                    url: "https://t".into(),
                }),
                json!({"type": "ADD_BOOKMARK", "payload": {"title": "T", "url": "https://t"}}),
            ),
        ];
        for (request, wire) in cases {
            assert_eq!(serde_json::to_value(&request).unwrap(), wire);
            assert_eq!(wire["type"], request.tag());
            assert_eq!(serde_json::from_value::<Request>(wire).unwrap(), request);
        }
    }

    #[test]
    fn ai_request_decodes_from_page_message() {
        let wire = json!({
            "type": "AI_REQUEST",
            "payload": {
                "action": "codeExplain",
                "text": "fn main() {}",
                "config": {"apiProvider": "groq", "preferredLanguage": "en", "theme": "dark", "shortcut": "Ctrl+K"}
            }
        });
        let Request::AiRequest(payload) = serde_json::from_value(wire).unwrap() else {
            panic!("expected AI_REQUEST");
        };
        assert_eq!(payload.action, AiAction::CodeExplain);
        assert_eq!(payload.config.preferred_language, "en");
    }

    #[test]
    fn unknown_type_is_a_decode_error() {
        assert!(serde_json::from_value::<Request>(json!({"type": "FORMAT_DISK"})).is_err());
    }

    #[test]
    fn response_omits_unset_fields() {
        assert_eq!(serde_json::to_value(Response::ok()).unwrap(), json!({"success": true}));
        assert_eq!(
            serde_json::to_value(Response::failure("no")).unwrap(),
            json!({"success": false, "error": "no"})
        );
    }
}
