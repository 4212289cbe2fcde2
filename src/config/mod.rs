//! Settings domain — configuration, menus, and their persistence.
//!
//!   - Configuration / ConfigPatch — the flat settings object + partial updates
//!   - shortcut.rs — validated `Mod+Key` shortcut type
//!   - menu.rs     — menu items and the built-in menus
//!   - store.rs    — key-value backends and the ConfigStore facade

pub mod menu;
pub mod shortcut;
pub mod store;

pub use menu::{MenuContext, MenuItem};
pub use shortcut::Shortcut;
pub use store::{ConfigStore, FileStorage, MemoryStorage, StorageBackend, StorageData, StoragePatch};

use serde::{Deserialize, Serialize};

use crate::llm::provider::ApiProvider;
use crate::llm::prompts::DEFAULT_TARGET_LANGUAGE;

pub const DEFAULT_SHORTCUT: &str = "Alt+Tab";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// The flat settings object edited by the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub api_provider: ApiProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub preferred_language: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_shortcut")]
    pub shortcut: Shortcut,
}

fn default_language() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_shortcut() -> Shortcut {
    Shortcut::default()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_provider: ApiProvider::default(),
            api_key: None,
            preferred_language: default_language(),
            theme: Theme::default(),
            shortcut: default_shortcut(),
        }
    }
}

/// Partial configuration update; `None` fields keep their current value.
///
/// An empty `apiKey` clears the stored key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_provider: Option<ApiProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<Shortcut>,
}

impl ConfigPatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Configuration {
    /// Apply a patch field by field.
    pub fn merge(&mut self, patch: ConfigPatch) {
        if let Some(provider) = patch.api_provider {
            self.api_provider = provider;
        }
        if let Some(key) = patch.api_key {
            let key = key.trim().to_string();
            self.api_key = if key.is_empty() { None } else { Some(key) };
        }
        if let Some(lang) = patch.preferred_language {
            self.preferred_language = lang;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(shortcut) = patch.shortcut {
            self.shortcut = shortcut;
        }
    }

    /// Whether user-visible text should be Chinese.
    pub fn prefers_chinese(&self) -> bool {
        self.preferred_language.to_ascii_lowercase().starts_with("zh")
    }
}
