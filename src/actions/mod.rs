//! Action domain — the commands a menu item can trigger.
//!
//! Public API:
//!   - ActionId / AiAction — closed sets of action identifiers
//!   - ActionResult        — what the menu renders after an action ran
//!   - ActionDispatcher    — resolves an action against selection + config
//!   - MenuSession         — one menu interaction with a snapshot of settings
//!
//! Adding an action means adding a variant here; every `match` over
//! `ActionId` then fails to compile until the new action is handled.

pub mod dispatcher;
pub mod locale;
pub mod page;
pub mod session;

pub use dispatcher::ActionDispatcher;
pub use page::PageContext;
pub use session::MenuSession;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Identifiers ────────────────────────────────────────────────────

/// Every command a menu item can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionId {
    Translate,
    Summarize,
    Explain,
    Rewrite,
    CodeExplain,
    SummarizePage,
    Search,
    Copy,
    #[serde(rename = "sendToAI")]
    SendToAi,
    AiChat,
    SwitchTab,
    History,
    NewTab,
    Bookmark,
    Screenshot,
    Settings,
}

/// The subset of actions answered by the chat-completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiAction {
    Translate,
    Summarize,
    Explain,
    Rewrite,
    CodeExplain,
    SummarizePage,
}

/// An action identifier that is not part of the closed action set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported action: {0}")]
pub struct UnsupportedAction(pub String);

impl ActionId {
    pub const ALL: [ActionId; 16] = [
        ActionId::Translate,
        ActionId::Summarize,
        ActionId::Explain,
        ActionId::Rewrite,
        ActionId::CodeExplain,
        ActionId::SummarizePage,
        ActionId::Search,
        ActionId::Copy,
        ActionId::SendToAi,
        ActionId::AiChat,
        ActionId::SwitchTab,
        ActionId::History,
        ActionId::NewTab,
        ActionId::Bookmark,
        ActionId::Screenshot,
        ActionId::Settings,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Translate => "translate",
            ActionId::Summarize => "summarize",
            ActionId::Explain => "explain",
            ActionId::Rewrite => "rewrite",
            ActionId::CodeExplain => "codeExplain",
            ActionId::SummarizePage => "summarizePage",
            ActionId::Search => "search",
            ActionId::Copy => "copy",
            ActionId::SendToAi => "sendToAI",
            ActionId::AiChat => "aiChat",
            ActionId::SwitchTab => "switchTab",
            ActionId::History => "history",
            ActionId::NewTab => "newTab",
            ActionId::Bookmark => "bookmark",
            ActionId::Screenshot => "screenshot",
            ActionId::Settings => "settings",
        }
    }

    /// The AI action behind this menu command, if it has one.
    pub fn ai_action(&self) -> Option<AiAction> {
        match self {
            ActionId::Translate => Some(AiAction::Translate),
            ActionId::Summarize => Some(AiAction::Summarize),
            ActionId::Explain => Some(AiAction::Explain),
            ActionId::Rewrite => Some(AiAction::Rewrite),
            ActionId::CodeExplain => Some(AiAction::CodeExplain),
            ActionId::SummarizePage => Some(AiAction::SummarizePage),
            _ => None,
        }
    }

    /// Whether the action refuses to run without selected text.
    pub fn requires_selection(&self) -> bool {
        matches!(
            self,
            ActionId::Translate
                | ActionId::Summarize
                | ActionId::Explain
                | ActionId::Rewrite
                | ActionId::CodeExplain
                | ActionId::Copy
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = UnsupportedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnsupportedAction(s.to_string()))
    }
}

impl AiAction {
    pub fn as_str(&self) -> &'static str {
        ActionId::from(*self).as_str()
    }
}

impl From<AiAction> for ActionId {
    fn from(action: AiAction) -> Self {
        match action {
            AiAction::Translate => ActionId::Translate,
            AiAction::Summarize => ActionId::Summarize,
            AiAction::Explain => ActionId::Explain,
            AiAction::Rewrite => ActionId::Rewrite,
            AiAction::CodeExplain => ActionId::CodeExplain,
            AiAction::SummarizePage => ActionId::SummarizePage,
        }
    }
}

impl FromStr for AiAction {
    type Err = UnsupportedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ActionId>()?
            .ai_action()
            .ok_or_else(|| UnsupportedAction(s.to_string()))
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Results ────────────────────────────────────────────────────────

/// How the menu should present an action's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// AI-generated text to show in the result panel.
    Ai,
    /// A new browsing context was opened at `url`.
    Redirect,
    Success,
    Error,
    Info,
}

/// Outcome of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ActionResult {
    pub fn ai(text: impl Into<String>) -> Self {
        Self::with_text(ActionKind::Ai, text)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_text(ActionKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_text(ActionKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_text(ActionKind::Info, message)
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Redirect,
            result: None,
            url: Some(url.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ActionKind::Error
    }

    fn with_text(kind: ActionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            result: Some(text.into()),
            url: None,
        }
    }
}
