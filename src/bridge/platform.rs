//! Privileged platform seam — tabs, capture, bookmarks, downloads.
//!
//! Only the background handler talks to this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One open tab, as reported by the tab manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The host has no such capability.
    #[error("Not supported on this host: {0}")]
    Unsupported(String),
    /// The platform API refused the call.
    #[error("Platform rejected the call: {0}")]
    Rejected(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserPlatform: Send + Sync {
    /// Tabs of the current window.
    async fn query_tabs(&self) -> Result<Vec<Tab>, PlatformError>;

    async fn activate_tab(&self, tab_id: i64) -> Result<(), PlatformError>;

    /// Open a tab, blank when `url` is `None`.
    async fn create_tab(&self, url: Option<String>) -> Result<(), PlatformError>;

    /// PNG bytes of the visible area of the active tab.
    async fn capture_visible_tab(&self) -> Result<Vec<u8>, PlatformError>;

    /// Save a `data:` URL as a download named `filename`.
    async fn download(&self, filename: &str, data_url: &str) -> Result<(), PlatformError>;

    async fn create_bookmark(&self, title: &str, url: &str) -> Result<(), PlatformError>;

    async fn open_options_page(&self) -> Result<(), PlatformError>;
}
