//! Extraction client for an OpenAI-compatible chat completions endpoint.
//!
//! [`ExtractionClient`] is either `Live`, holding a configured HTTP client, or
//! `Disabled`, holding the reason no credential is usable. Calling
//! [`extract`](ExtractionClient::extract) on a disabled client fails with a
//! configuration error without touching the network.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ExtractionError};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const TIMEOUT_VAR: &str = "BOUNDARY_TIMEOUT_SECS";

/// Value shipped in example `.env` files; treated the same as no key.
pub const PLACEHOLDER_API_KEY: &str = "your-openai-key-here";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Settings for the extraction endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Endpoint root without trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ExtractionConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for anything
    /// unset, blank, or unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self {
            api_key: set(API_KEY_VAR),
            ..Self::default()
        };
        if let Some(model) = set(MODEL_VAR) {
            config.model = model;
        }
        if let Some(base_url) = set(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(raw) = set(TIMEOUT_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, var = TIMEOUT_VAR, "ignoring invalid timeout"),
            }
        }
        config
    }

    /// The configured credential, or why there is none usable.
    pub fn credential(&self) -> Result<&str, String> {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => Err(format!("{API_KEY_VAR} is not set")),
            Some(PLACEHOLDER_API_KEY) => Err(format!("{API_KEY_VAR} is the placeholder value")),
            Some(key) => Ok(key),
        }
    }
}

/// Capability boundary for the extraction call.
#[derive(Debug)]
pub enum ExtractionClient {
    Live(LiveClient),
    Disabled { reason: String },
}

impl ExtractionClient {
    /// Live if the config carries a usable credential, Disabled otherwise.
    pub fn from_config(config: ExtractionConfig) -> Self {
        let key = match config.credential() {
            Ok(key) => key.to_string(),
            Err(reason) => {
                warn!(reason = %reason, "extraction client disabled");
                return Self::disabled(reason);
            }
        };
        match LiveClient::new(key, &config) {
            Ok(live) => {
                info!(model = %live.model, base_url = %live.base_url, "extraction client ready");
                Self::Live(live)
            }
            Err(e) => {
                let reason = format!("HTTP client could not be built: {e}");
                warn!(reason = %reason, "extraction client disabled");
                Self::disabled(reason)
            }
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::Disabled {
            reason: reason.into(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// Request timeout of the live client; `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Live(live) => Some(live.timeout),
            Self::Disabled { .. } => None,
        }
    }

    /// Send both prompts and return the raw message content.
    pub async fn extract(&self, system: &str, user: &str) -> Result<String, ExtractionError> {
        match self {
            Self::Live(live) => Ok(live.complete(system, user).await?),
            Self::Disabled { reason } => Err(ExtractionError::Configuration(reason.clone())),
        }
    }
}

// ── Wire types ──

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// HTTP client bound to one endpoint, model, and credential.
pub struct LiveClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    temperature: f64,
    max_tokens: u32,
}

impl std::fmt::Debug for LiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LiveClient {
    fn new(api_key: String, config: &ExtractionConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, ApiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        info!(url = %url, model = %self.model, "requesting extraction");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| self.classify(e))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ApiError::EmptyResponse)?;

        debug!(bytes = content.len(), "extraction response received");
        Ok(content)
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Http(err)
        }
    }
}
