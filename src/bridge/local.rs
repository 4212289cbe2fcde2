//! In-process bridge.
//!
//! Runs the background handler directly, but still pushes both the
//! request and the response through JSON, so anything that would not
//! survive a real message channel fails here too.

use async_trait::async_trait;

use super::{Background, Bridge, BridgeError, Request, Response};

pub struct LocalBridge {
    background: Background,
}

impl LocalBridge {
    pub fn new(background: Background) -> Self {
        Self { background }
    }
}

#[async_trait]
impl Bridge for LocalBridge {
    async fn send(&self, request: Request) -> Result<Response, BridgeError> {
        let wire = serde_json::to_string(&request)?;
        let request: Request = serde_json::from_str(&wire)?;

        let response = self.background.handle(request).await;

        let wire = serde_json::to_string(&response)?;
        Ok(serde_json::from_str(&wire)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::platform::MockBrowserPlatform;
    use crate::config::ConfigStore;
    use crate::llm::AiClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn get_storage_round_trips_defaults() {
        let background = Background::new(
            Arc::new(MockBrowserPlatform::new()),
            AiClient::default(),
            ConfigStore::in_memory(),
        );
        let bridge = LocalBridge::new(background);

        let response = bridge.send(Request::GetStorage).await.unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(crate::config::StorageData::default()));
    }
}
