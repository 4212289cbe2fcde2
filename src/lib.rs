//! The Circle — library root.
//!
//! Wires the domains together. No business logic lives here, only
//! module declarations and the startup helpers the binary calls.
//!
//! Domains:
//!   - actions — action ids, dispatcher, menu sessions
//!   - bridge  — request/response messaging + the background handler
//!   - config  — settings object, menus, persistence
//!   - llm     — prompt catalog + chat-completion client
//!   - desktop — platform and page seams on a desktop host

pub mod actions;
pub mod bridge;
pub mod config;
pub mod desktop;
pub mod llm;
pub mod text;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge::Background;
use config::{ConfigStore, FileStorage};
use desktop::DesktopPlatform;
use llm::AiClient;

/// `<config dir>/the-circle`, where settings and bookmarks live.
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("the-circle"))
}

/// Load `.env.local` then `.env` from `dir`. Earlier files win, and
/// variables already set in the environment are never overridden.
pub fn load_env(dir: &Path) {
    for env_file in [".env.local", ".env"] {
        let path = dir.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
        }
    }
}

/// Logger on stderr, `RUST_LOG` controls verbosity (default: warn).
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}

/// Background handler backed by the settings file and the desktop host.
pub fn desktop_background() -> Result<Background, String> {
    let storage = FileStorage::default_location().map_err(|e| e.to_string())?;
    let storage_path = storage.path().to_path_buf();
    let platform = DesktopPlatform::from_system()
        .map_err(|e| e.to_string())?
        .with_options_target(storage_path.clone());

    log::info!("[STARTUP] Settings file: {}", storage_path.display());
    Ok(Background::new(
        Arc::new(platform),
        AiClient::default(),
        ConfigStore::new(Arc::new(storage)),
    ))
}
