//! Bot settings and credential loading.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{BotError, Result};

/// Default credentials file, written by the token-fetch script.
pub const DEFAULT_CREDENTIALS_PATH: &str = "./credentials/oauth_token.json";

/// Everything the bot needs besides the token.
#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Chat server host.
    pub host: String,
    /// Chat server port.
    pub port: u16,
    /// Bot account nickname.
    pub nickname: String,
    /// Channel to join.
    pub channel: String,
    /// Capabilities requested during the handshake.
    pub request_caps: Vec<String>,
    /// Chat message announced after joining, if any.
    pub greeting: Option<String>,
    /// Bound on each read inside the event loop.
    pub read_timeout: Duration,
    /// Bound on the whole login exchange.
    pub handshake_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: "irc.chat.twitch.tv".to_string(),
            port: 6667,
            nickname: "SeaBotBeepBoop".to_string(),
            channel: "#smokedseabass".to_string(),
            request_caps: vec![
                "twitch.tv/membership".to_string(),
                "twitch.tv/tags".to_string(),
                "twitch.tv/commands".to_string(),
            ],
            greeting: Some("Beep boop, hello everyone!".to_string()),
            read_timeout: Duration::from_secs(1),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

/// OAuth credentials, read once at startup.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Access token, without the `oauth:` prefix.
    pub access_token: String,
}

impl Credentials {
    /// Load from a JSON file. Missing or malformed files are fatal
    /// startup errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| BotError::Credentials {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| BotError::Credentials {
            path: path.display().to_string(),
            cause: e.to_string(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
