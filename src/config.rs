use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 12 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub session_idle_minutes: u64,
    pub chat: ChatConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            port: parsed(&lookup, "PORT", DEFAULT_PORT),
            session_idle_minutes: parsed(
                &lookup,
                "SESSION_IDLE_MINUTES",
                DEFAULT_SESSION_IDLE_MINUTES,
            ),
            chat: ChatConfig {
                api_key: text("DEEPSEEK_API_KEY"),
                base_url: text("CHAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: text("CHAT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature: parsed(&lookup, "CHAT_TEMPERATURE", DEFAULT_TEMPERATURE),
                timeout_secs: parsed(&lookup, "CHAT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.session_idle_ttl(), Duration::from_secs(12 * 60 * 60));
        assert_eq!(config.chat, ChatConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "3000"),
            ("SESSION_IDLE_MINUTES", "30"),
            ("DEEPSEEK_API_KEY", "sk-test"),
            ("CHAT_BASE_URL", "http://127.0.0.1:5555"),
            ("CHAT_MODEL", "other-model"),
            ("CHAT_TEMPERATURE", "0.2"),
            ("CHAT_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_idle_ttl(), Duration::from_secs(30 * 60));
        assert_eq!(config.chat.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.chat.base_url, "http://127.0.0.1:5555");
        assert_eq!(config.chat.model, "other-model");
        assert_eq!(config.chat.temperature, 0.2);
        assert_eq!(config.chat.timeout_secs, 5);
    }

    #[test]
    fn invalid_numbers_and_blank_key_fall_back() {
        let config = config(&[("PORT", "eighty"), ("DEEPSEEK_API_KEY", "  ")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.chat.api_key, None);
    }
}
