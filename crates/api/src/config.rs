use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Electoral assistant (LLM) configuration.
    pub assistant: AssistantConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let assistant = AssistantConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            assistant,
        }
    }
}

/// Configuration for the electoral assistant's LLM backend.
///
/// The API key is optional: without it the server still runs and the
/// assistant endpoint returns a configuration error in Spanish.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// API key for the chat-completions provider. `None` means unconfigured.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier to request.
    pub model: String,
}

/// Default chat-completions endpoint base.
const DEFAULT_ASSISTANT_BASE_URL: &str = "https://api.deepseek.com/v1";
/// Default model identifier.
const DEFAULT_ASSISTANT_MODEL: &str = "deepseek-chat";

impl AssistantConfig {
    /// Load assistant configuration from environment variables.
    ///
    /// | Env Var              | Required | Default                        |
    /// |----------------------|----------|--------------------------------|
    /// | `DEEPSEEK_API_KEY`   | no       | --                             |
    /// | `DEEPSEEK_BASE_URL`  | no       | `https://api.deepseek.com/v1`  |
    /// | `DEEPSEEK_MODEL`     | no       | `deepseek-chat`                |
    pub fn from_env() -> Self {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        let base_url = std::env::var("DEEPSEEK_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ASSISTANT_BASE_URL.into());
        let model =
            std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_ASSISTANT_MODEL.into());

        Self {
            api_key,
            base_url,
            model,
        }
    }
}
