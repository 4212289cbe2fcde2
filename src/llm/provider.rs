//! Provider metadata and API key resolution.
//!
//! Key lookup order for a call:
//!   1. `config.apiKey` when non-empty
//!   2. the provider's env var (GROQ_API_KEY)
//!   3. the OS keychain (service "the-circle", user = provider id)
//!
//! Steps 2 and 3 are the provider default and live behind `KeySource`
//! so tests can run without touching the environment or keychain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Configuration;

pub const KEYCHAIN_SERVICE: &str = "the-circle";

/// Supported chat-completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    #[default]
    Groq,
}

impl ApiProvider {
    pub fn id(&self) -> &'static str {
        match self {
            ApiProvider::Groq => "groq",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiProvider::Groq => "https://api.groq.com/openai/v1/chat/completions",
        }
    }

    pub fn env_key(&self) -> &'static str {
        match self {
            ApiProvider::Groq => "GROQ_API_KEY",
        }
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Provider metadata exposed to the settings surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub env_key: String,
    pub model: String,
}

/// All known providers and their display info.
pub fn all_providers() -> Vec<ProviderInfo> {
    vec![ProviderInfo {
        id: ApiProvider::Groq.id().to_string(),
        name: "Groq — Llama 3.2 90B".to_string(),
        env_key: ApiProvider::Groq.env_key().to_string(),
        model: super::prompts::MODEL.to_string(),
    }]
}

/// Where a provider's default key comes from when the config has none.
pub trait KeySource: Send + Sync {
    fn default_key(&self, provider: ApiProvider) -> Option<String>;
}

/// Env var first, then the OS keychain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeySource;

impl KeySource for SystemKeySource {
    fn default_key(&self, provider: ApiProvider) -> Option<String> {
        if let Ok(key) = std::env::var(provider.env_key()) {
            if !key.is_empty() {
                return Some(key);
            }
        }

        read_keychain(KEYCHAIN_SERVICE, provider)
    }
}

fn read_keychain(service: &str, provider: ApiProvider) -> Option<String> {
    let entry = match keyring::Entry::new(service, provider.id()) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("[SETTINGS] Keychain unavailable for {}: {}", provider, e);
            return None;
        }
    };
    match entry.get_password() {
        Ok(key) if !key.is_empty() => {
            log::info!("[SETTINGS] Loaded {} key from OS keychain", provider);
            Some(key)
        }
        Ok(_) | Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            log::warn!("[SETTINGS] Keychain lookup failed for {}: {}", provider, e);
            None
        }
    }
}

/// A provider with no default key at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaultKey;

impl KeySource for NoDefaultKey {
    fn default_key(&self, _provider: ApiProvider) -> Option<String> {
        None
    }
}

/// Resolve the key for a call, or `None` when no credential exists.
pub fn resolve_api_key(config: &Configuration, source: &dyn KeySource) -> Option<String> {
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Some(key.to_string()),
        _ => source.default_key(config.api_provider),
    }
}

/// Store a key in the OS keychain so later sessions pick it up as the default.
pub fn save_api_key(provider: ApiProvider, api_key: &str) -> Result<(), String> {
    write_keychain(KEYCHAIN_SERVICE, provider, api_key)?;
    log::info!("[SETTINGS] API key saved for provider: {}", provider);
    Ok(())
}

fn write_keychain(service: &str, provider: ApiProvider, api_key: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(service, provider.id())
        .map_err(|e| format!("Keyring error: {}", e))?;
    entry
        .set_password(api_key)
        .map_err(|e| format!("Failed to save key: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedKey(&'static str);

    impl KeySource for FixedKey {
        fn default_key(&self, _provider: ApiProvider) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn explicit_key_wins_over_default() {
        let config = Configuration {
            api_key: Some("sk-explicit".to_string()),
            ..Configuration::default()
        };
        assert_eq!(
            resolve_api_key(&config, &FixedKey("sk-default")).as_deref(),
            Some("sk-explicit")
        );
    }

    #[test]
    fn blank_key_falls_back_to_default() {
        let config = Configuration {
            api_key: Some("   ".to_string()),
            ..Configuration::default()
        };
        assert_eq!(
            resolve_api_key(&config, &FixedKey("sk-default")).as_deref(),
            Some("sk-default")
        );
        assert_eq!(resolve_api_key(&config, &NoDefaultKey), None);
    }

    // Talks to the real OS keychain.
    #[test]
    #[ignore]
    fn keychain_round_trip() {
        let service = "the-circle-test";
        write_keychain(service, ApiProvider::Groq, "gsk_round_trip").unwrap();
        let read = read_keychain(service, ApiProvider::Groq);

        keyring::Entry::new(service, ApiProvider::Groq.id())
            .unwrap()
            .delete_credential()
            .unwrap();
        assert_eq!(read.as_deref(), Some("gsk_round_trip"));
        assert_eq!(read_keychain(service, ApiProvider::Groq), None);
    }

    #[test]
    fn provider_wire_name() {
        assert_eq!(serde_json::to_string(&ApiProvider::Groq).unwrap(), "\"groq\"");
        assert_eq!(all_providers()[0].env_key, "GROQ_API_KEY");
    }
}
