//! Desktop host — the platform and page seams on a plain desktop.
//!
//! There is no browser here: URLs go to the system opener, the
//! clipboard goes through arboard, bookmarks live in a JSON file and
//! screenshots land in the download directory. Tab listing and screen
//! capture have no desktop counterpart and report `Unsupported`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::actions::PageContext;
use crate::bridge::{BrowserPlatform, PlatformError, Tab};

const BOOKMARKS_FILE: &str = "bookmarks.json";

/// Hand `target` (a URL or a path) to the OS default handler.
pub async fn open_in_system(target: &str) -> Result<(), PlatformError> {
    let mut cmd = if cfg!(target_os = "macos") {
        tokio::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = tokio::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        tokio::process::Command::new("xdg-open")
    };
    cmd.arg(target)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());

    let status = cmd.status().await?;
    if status.success() {
        log::info!("[DESKTOP] Opened {}", target);
        Ok(())
    } else {
        Err(PlatformError::Rejected(format!(
            "system opener exited with {} for {}",
            status, target
        )))
    }
}

/// One saved bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}

// ── Platform ───────────────────────────────────────────────────────

pub struct DesktopPlatform {
    data_dir: PathBuf,
    download_dir: PathBuf,
    options_target: PathBuf,
}

impl DesktopPlatform {
    pub fn new(data_dir: impl Into<PathBuf>, download_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let options_target = data_dir.join("storage.json");
        Self {
            data_dir,
            download_dir: download_dir.into(),
            options_target,
        }
    }

    /// Config dir for bookmarks, the user's download dir for captures.
    pub fn from_system() -> Result<Self, PlatformError> {
        let data_dir = crate::app_config_dir()
            .ok_or_else(|| PlatformError::Unsupported("no config directory".into()))?;
        let download_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| PlatformError::Unsupported("no download directory".into()))?;
        Ok(Self::new(data_dir, download_dir))
    }

    /// What "open settings" shows: the settings file by default.
    pub fn with_options_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.options_target = target.into();
        self
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir.join(BOOKMARKS_FILE)
    }

    pub async fn bookmarks(&self) -> Result<Vec<Bookmark>, PlatformError> {
        read_bookmarks(&self.bookmarks_path()).await
    }
}

async fn read_bookmarks(path: &Path) -> Result<Vec<Bookmark>, PlatformError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                log::warn!("[DESKTOP] {} is invalid, starting over: {}", path.display(), e);
                Ok(Vec::new())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Bytes of a `data:<mime>;base64,<payload>` URL.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, PlatformError> {
    let (header, payload) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| PlatformError::Rejected("not a data URL".into()))?;
    if !header.ends_with(";base64") {
        return Err(PlatformError::Rejected("data URL is not base64".into()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| PlatformError::Rejected(format!("bad base64 payload: {}", e)))
}

#[async_trait]
impl BrowserPlatform for DesktopPlatform {
    async fn query_tabs(&self) -> Result<Vec<Tab>, PlatformError> {
        Err(PlatformError::Unsupported("tab listing".into()))
    }

    async fn activate_tab(&self, _tab_id: i64) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("tab switching".into()))
    }

    async fn create_tab(&self, url: Option<String>) -> Result<(), PlatformError> {
        match url {
            Some(url) => open_in_system(&url).await,
            None => Err(PlatformError::Unsupported("blank tabs".into())),
        }
    }

    async fn capture_visible_tab(&self) -> Result<Vec<u8>, PlatformError> {
        Err(PlatformError::Unsupported("screen capture".into()))
    }

    async fn download(&self, filename: &str, data_url: &str) -> Result<(), PlatformError> {
        let bytes = decode_data_url(data_url)?;
        // Keep downloads inside the download dir.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| PlatformError::Rejected(format!("bad filename: {}", filename)))?;
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self.download_dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        log::info!("[DESKTOP] Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn create_bookmark(&self, title: &str, url: &str) -> Result<(), PlatformError> {
        let path = self.bookmarks_path();
        let mut list = read_bookmarks(&path).await?;
        list.push(Bookmark {
            title: title.to_string(),
            url: url.to_string(),
        });
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| PlatformError::Rejected(format!("Failed to serialize bookmarks: {}", e)))?;
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(&path, json).await?;
        log::info!("[DESKTOP] Bookmarked {} ({} total)", url, list.len());
        Ok(())
    }

    async fn open_options_page(&self) -> Result<(), PlatformError> {
        match self.options_target.to_str() {
            Some(target) => open_in_system(target).await,
            None => Err(PlatformError::Rejected("settings path is not UTF-8".into())),
        }
    }
}

// ── Page ───────────────────────────────────────────────────────────

/// Page side on the desktop: a text document plus the system clipboard.
#[derive(Debug, Clone, Default)]
pub struct DesktopPage {
    pub title: String,
    pub url: String,
    pub body: String,
}

#[async_trait]
impl PageContext for DesktopPage {
    fn body_text(&self) -> String {
        self.body.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    async fn open_window(&self, url: &str) -> Result<(), PlatformError> {
        open_in_system(url).await
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| PlatformError::Rejected(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| PlatformError::Rejected(e.to_string()))?;
        log::info!("[DESKTOP] Copied {} chars to clipboard", text.chars().count());
        Ok(())
    }
}
