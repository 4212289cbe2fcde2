//! Page seam — what the in-page side can see and do without privileges.
//!
//! Opening a new browsing context and writing the clipboard happen
//! here, in the page. Everything that needs elevated APIs goes through
//! the messaging bridge instead.

use async_trait::async_trait;

use crate::bridge::PlatformError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageContext: Send + Sync {
    /// Rendered text of the whole page body.
    fn body_text(&self) -> String;

    fn title(&self) -> String;

    fn url(&self) -> String;

    /// Open `url` in a new browsing context.
    async fn open_window(&self, url: &str) -> Result<(), PlatformError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError>;
}
