//! Background handler — the privileged side of the bridge.
//!
//! Holds no state of its own between requests: the platform, the AI
//! client and the store are all it needs. Each arm catches its own
//! failure and turns it into `{success:false, error}`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;

use super::platform::BrowserPlatform;
use super::{AiRequestPayload, BookmarkPayload, Request, Response};
use crate::config::ConfigStore;
use crate::llm::prompts::{system_prompt, PromptParams};
use crate::llm::AiClient;

#[derive(Clone)]
pub struct Background {
    platform: Arc<dyn BrowserPlatform>,
    ai: AiClient,
    store: ConfigStore,
}

impl Background {
    pub fn new(platform: Arc<dyn BrowserPlatform>, ai: AiClient, store: ConfigStore) -> Self {
        Self { platform, ai, store }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Answer one request. Never fails; errors become `success:false`.
    pub async fn handle(&self, request: Request) -> Response {
        let tag = request.tag();
        log::info!("[BRIDGE] <- {}", tag);

        let response = match request {
            Request::AiRequest(payload) => self.ai_request(payload).await,
            Request::GetTabs => match self.platform.query_tabs().await {
                Ok(tabs) => Response::with_tabs(tabs),
                Err(e) => Response::failure(e.to_string()),
            },
            Request::SwitchTab(tab_id) => ack(self.platform.activate_tab(tab_id).await),
            Request::NewTab => ack(self.platform.create_tab(None).await),
            Request::OpenUrl(url) => ack(self.platform.create_tab(Some(url)).await),
            Request::Screenshot => self.screenshot().await,
            Request::AddBookmark(BookmarkPayload { title, url }) => {
                ack(self.platform.create_bookmark(&title, &url).await)
            }
            Request::OpenOptions => ack(self.platform.open_options_page().await),
            Request::GetStorage => match self.store.get_storage_data().await {
                Ok(data) => Response::with_data(data),
                Err(e) => Response::failure(e.to_string()),
            },
            Request::SaveConfig(patch) => match self.store.save_config(patch).await {
                Ok(_) => match self.store.get_storage_data().await {
                    Ok(data) => Response::with_data(data),
                    Err(e) => Response::failure(e.to_string()),
                },
                Err(e) => Response::failure(e.to_string()),
            },
        };

        if response.success {
            log::info!("[BRIDGE] -> {} ok", tag);
        } else {
            log::warn!(
                "[BRIDGE] -> {} failed: {}",
                tag,
                response.error.as_deref().unwrap_or("unknown error")
            );
        }
        response
    }

    async fn ai_request(&self, payload: AiRequestPayload) -> Response {
        let AiRequestPayload { action, text, config } = payload;
        let params = PromptParams::with_lang(config.preferred_language.clone());
        let prompt = system_prompt(action, &params);
        self.ai.complete(&text, &prompt, &config).await.into()
    }

    async fn screenshot(&self) -> Response {
        let png = match self.platform.capture_visible_tab().await {
            Ok(bytes) => bytes,
            Err(e) => return Response::failure(e.to_string()),
        };
        let data_url = png_data_url(&png);
        let filename = screenshot_filename(epoch_millis());
        match self.platform.download(&filename, &data_url).await {
            Ok(()) => Response::with_data_url(data_url),
            Err(e) => Response::failure(e.to_string()),
        }
    }
}

fn ack(outcome: Result<(), super::PlatformError>) -> Response {
    match outcome {
        Ok(()) => Response::ok(),
        Err(e) => Response::failure(e.to_string()),
    }
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

pub fn screenshot_filename(millis: u128) -> String {
    format!("screenshot-{}.png", millis)
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::platform::MockBrowserPlatform;
    use crate::bridge::{PlatformError, Tab};
    use crate::config::{ConfigPatch, Theme};
    use crate::llm::provider::NoDefaultKey;
    use crate::llm::transport::{ChatTransport, HttpReply};
    use async_trait::async_trait;
    use mockall::predicate::eq;

    struct Unreachable;

    #[async_trait]
    impl ChatTransport for Unreachable {
        async fn post_json(
            &self,
            _url: &str,
            _bearer: &str,
            _body: &serde_json::Value,
        ) -> Result<HttpReply, String> {
            Err("offline".into())
        }
    }

    fn background(platform: MockBrowserPlatform) -> Background {
        Background::new(
            Arc::new(platform),
            AiClient::new(Arc::new(Unreachable), Arc::new(NoDefaultKey)),
            ConfigStore::in_memory(),
        )
    }

    #[tokio::test]
    async fn get_tabs_returns_the_list() {
        let mut platform = MockBrowserPlatform::new();
        platform.expect_query_tabs().times(1).returning(|| {
            Ok(vec![Tab {
                id: 3,
                title: "Docs".into(),
                url: "https://docs.rs".into(),
                active: true,
            }])
        });

        let response = background(platform).handle(Request::GetTabs).await;
        assert!(response.success);
        assert_eq!(response.tabs.map(|t| t.len()), Some(1));
    }

    #[tokio::test]
    async fn platform_rejection_becomes_failure() {
        let mut platform = MockBrowserPlatform::new();
        platform
            .expect_activate_tab()
            .with(eq(99))
            .returning(|_| Err(PlatformError::Rejected("No tab with id: 99".into())));

        let response = background(platform).handle(Request::SwitchTab(99)).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("No tab with id: 99"));
    }

    #[tokio::test]
    async fn open_url_creates_a_tab_at_that_url() {
        let mut platform = MockBrowserPlatform::new();
        platform
            .expect_create_tab()
            .with(eq(Some("chrome://history".to_string())))
            .times(1)
            .returning(|_| Ok(()));

        let response = background(platform)
            .handle(Request::OpenUrl("chrome://history".into()))
            .await;
        assert_eq!(response, Response::ok());
    }

    #[tokio::test]
    async fn screenshot_downloads_and_returns_data_url() {
        let mut platform = MockBrowserPlatform::new();
        platform
            .expect_capture_visible_tab()
            .returning(|| Ok(vec![0x89, b'P', b'N', b'G']));
        platform
            .expect_download()
            .withf(|name, url| {
                name.starts_with("screenshot-")
                    && name.ends_with(".png")
                    && url.starts_with("data:image/png;base64,")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let response = background(platform).handle(Request::Screenshot).await;
        assert!(response.success);
        assert_eq!(response.data_url.as_deref(), Some("data:image/png;base64,iVBORw=="));
    }

    #[tokio::test]
    async fn screenshot_capture_failure_skips_download() {
        let mut platform = MockBrowserPlatform::new();
        platform
            .expect_capture_visible_tab()
            .returning(|| Err(PlatformError::Unsupported("screen capture".into())));
        platform.expect_download().never();

        let response = background(platform).handle(Request::Screenshot).await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn ai_request_without_key_reports_missing_credential() {
        let payload = AiRequestPayload {
            action: crate::actions::AiAction::Summarize,
            text: "hello".into(),
            config: Default::default(),
        };
        let response = background(MockBrowserPlatform::new())
            .handle(Request::AiRequest(payload))
            .await;
        assert!(!response.success);
        assert_eq!(response.error_kind.as_deref(), Some("missingCredential"));
    }

    #[tokio::test]
    async fn save_config_merges_and_returns_storage() {
        let bg = background(MockBrowserPlatform::new());
        let response = bg
            .handle(Request::SaveConfig(ConfigPatch::theme(Theme::Dark)))
            .await;
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.config.theme, Theme::Dark);
        assert_eq!(data.config.preferred_language, "zh-CN");

        let stored = bg.handle(Request::GetStorage).await.data.unwrap();
        assert_eq!(stored, data);
    }

    #[test]
    fn filename_uses_epoch_millis() {
        assert_eq!(screenshot_filename(1700000000123), "screenshot-1700000000123.png");
    }
}
