//! Action dispatcher — resolves one menu command.
//!
//! Steps per call:
//! 1. Parse the action id (unknown → `error`, never a panic)
//! 2. Check the selection precondition
//! 3. Either ask the background over the bridge, or act on the page
//! 4. Turn the outcome into an `ActionResult` with a localized message
//!
//! Selection and config are parameters of every call. The dispatcher
//! keeps nothing between calls.

use std::sync::Arc;

use super::locale::Notice;
use super::page::PageContext;
use super::{ActionId, ActionResult, AiAction};
use crate::bridge::{AiRequestPayload, BookmarkPayload, Bridge, Request, Response};
use crate::config::Configuration;
use crate::text::{collapse_whitespace, truncate_chars};

/// Page text beyond this many characters is not sent for summarizing.
pub const PAGE_TEXT_LIMIT: usize = 10_000;

pub const SEARCH_URL: &str = "https://www.google.com/search?q=";
pub const CHAT_URL: &str = "https://chat.openai.com/";
pub const HISTORY_URL: &str = "chrome://history";

pub struct ActionDispatcher {
    bridge: Arc<dyn Bridge>,
    page: Arc<dyn PageContext>,
}

impl ActionDispatcher {
    pub fn new(bridge: Arc<dyn Bridge>, page: Arc<dyn PageContext>) -> Self {
        Self { bridge, page }
    }

    /// Run the action named `action_id`.
    pub async fn execute(
        &self,
        action_id: &str,
        selected_text: &str,
        config: &Configuration,
    ) -> ActionResult {
        match action_id.parse::<ActionId>() {
            Ok(action) => self.execute_action(action, selected_text, config).await,
            Err(e) => {
                log::warn!("[ACTION] {}", e);
                ActionResult::error(Notice::UnknownAction.text(config))
            }
        }
    }

    pub async fn execute_action(
        &self,
        action: ActionId,
        selected_text: &str,
        config: &Configuration,
    ) -> ActionResult {
        let selection = non_blank(selected_text);
        log::info!(
            "[ACTION] {} (selection: {} chars)",
            action,
            selection.map(|s| s.chars().count()).unwrap_or(0)
        );

        match action {
            ActionId::Translate
            | ActionId::Summarize
            | ActionId::Explain
            | ActionId::Rewrite
            | ActionId::CodeExplain => {
                let (Some(text), Some(ai_action)) = (selection, action.ai_action()) else {
                    return ActionResult::error(Notice::SelectTextFirst(action).text(config));
                };
                self.ask_ai(ai_action, text, config).await
            }
            ActionId::SummarizePage => {
                let page_text = collapse_whitespace(&self.page.body_text());
                let page_text = truncate_chars(&page_text, PAGE_TEXT_LIMIT);
                self.ask_ai(AiAction::SummarizePage, page_text, config).await
            }
            ActionId::Search => {
                let url = format!("{}{}", SEARCH_URL, urlencoding::encode(selected_text));
                self.open(url, config).await
            }
            ActionId::Copy => {
                let Some(text) = selection else {
                    return ActionResult::error(Notice::NothingSelected.text(config));
                };
                match self.page.write_clipboard(text).await {
                    Ok(()) => ActionResult::success(Notice::CopiedToClipboard.text(config)),
                    Err(e) => {
                        log::warn!("[ACTION] Clipboard write failed: {}", e);
                        ActionResult::error(Notice::CopyFailed.text(config))
                    }
                }
            }
            ActionId::SendToAi => {
                let url = format!("{}?q={}", CHAT_URL, urlencoding::encode(selected_text));
                self.open(url, config).await
            }
            ActionId::AiChat => self.open(CHAT_URL.to_string(), config).await,
            ActionId::SwitchTab => match self.send(Request::GetTabs).await {
                Some(Response {
                    success: true,
                    tabs,
                    ..
                }) => {
                    let count = tabs.map(|t| t.len()).unwrap_or(0);
                    ActionResult::info(Notice::TabsOpen(count).text(config))
                }
                _ => ActionResult::error(Notice::GetTabsFailed.text(config)),
            },
            ActionId::History => {
                self.acknowledged(
                    Request::OpenUrl(HISTORY_URL.to_string()),
                    Notice::HistoryOpened,
                    Notice::HistoryFailed,
                    config,
                )
                .await
            }
            ActionId::NewTab => {
                self.acknowledged(Request::NewTab, Notice::NewTabOpened, Notice::NewTabFailed, config)
                    .await
            }
            ActionId::Bookmark => {
                let payload = BookmarkPayload {
                    title: self.page.title(),
                    url: self.page.url(),
                };
                self.acknowledged(
                    Request::AddBookmark(payload),
                    Notice::BookmarkAdded,
                    Notice::BookmarkFailed,
                    config,
                )
                .await
            }
            ActionId::Screenshot => {
                self.acknowledged(
                    Request::Screenshot,
                    Notice::ScreenshotSaved,
                    Notice::ScreenshotFailed,
                    config,
                )
                .await
            }
            ActionId::Settings => {
                self.acknowledged(
                    Request::OpenOptions,
                    Notice::SettingsOpened,
                    Notice::SettingsFailed,
                    config,
                )
                .await
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    async fn ask_ai(&self, action: AiAction, text: &str, config: &Configuration) -> ActionResult {
        let request = Request::AiRequest(AiRequestPayload {
            action,
            text: text.to_string(),
            config: config.clone(),
        });
        match self.send(request).await {
            Some(response) => ai_result(response, config),
            None => ActionResult::error(Notice::AiRequestFailed.text(config)),
        }
    }

    async fn open(&self, url: String, config: &Configuration) -> ActionResult {
        match self.page.open_window(&url).await {
            Ok(()) => ActionResult::redirect(url),
            Err(e) => {
                log::warn!("[ACTION] Could not open {}: {}", url, e);
                ActionResult::error(Notice::RequestFailed(e.to_string()).text(config))
            }
        }
    }

    async fn acknowledged(
        &self,
        request: Request,
        done: Notice,
        failed: Notice,
        config: &Configuration,
    ) -> ActionResult {
        match self.send(request).await {
            Some(response) if response.success => ActionResult::success(done.text(config)),
            _ => ActionResult::error(failed.text(config)),
        }
    }

    /// `None` when the bridge itself failed; the reason is logged.
    async fn send(&self, request: Request) -> Option<Response> {
        let tag = request.tag();
        match self.bridge.send(request).await {
            Ok(response) => Some(response),
            Err(e) => {
                log::error!("[ACTION] {} did not get a response: {}", tag, e);
                None
            }
        }
    }
}

fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Map an AI response onto what the menu shows.
fn ai_result(response: Response, config: &Configuration) -> ActionResult {
    if response.success {
        return match response.result {
            Some(text) if !text.is_empty() => ActionResult::ai(text),
            _ => ActionResult::error(Notice::NoAiResult.text(config)),
        };
    }

    let error = response.error.unwrap_or_default();
    let notice = match response.error_kind.as_deref() {
        Some("missingCredential") => Notice::MissingApiKey,
        Some("emptyResponse") => Notice::NoAiResult,
        // Raw upstream body, kept for diagnosis.
        Some("http") => return ActionResult::error(error),
        Some("transport") => {
            let detail = error.strip_prefix("Request failed: ").unwrap_or(&error);
            Notice::RequestFailed(detail.to_string())
        }
        _ => Notice::AiRequestFailed,
    };
    ActionResult::error(notice.text(config))
}
