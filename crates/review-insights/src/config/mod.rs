use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_LLM_MAX_TOKENS: u32 = 4000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            review: ReviewConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which source drafts review ratings, goals, accomplishments and feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewProviderKind {
    Deterministic,
    Generated,
}

impl ReviewProviderKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "deterministic" | "rules" => Ok(Self::Deterministic),
            "generated" | "llm" | "ai" => Ok(Self::Generated),
            other => Err(ConfigError::UnknownReviewProvider(other.to_string())),
        }
    }
}

/// Review drafting settings; `llm` is only consulted for the generated provider.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub provider: ReviewProviderKind,
    pub llm: LlmConfig,
}

impl ReviewConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let provider = ReviewProviderKind::parse(
            &env::var("APP_REVIEW_PROVIDER").unwrap_or_else(|_| "deterministic".to_string()),
        )?;

        let max_tokens = match env::var("APP_LLM_MAX_TOKENS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidMaxTokens)?,
            Err(_) => DEFAULT_LLM_MAX_TOKENS,
        };

        let llm = LlmConfig {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: env::var("APP_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            endpoint: env::var("APP_LLM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_LLM_ENDPOINT.to_string()),
            max_tokens,
            temperature: 0.7,
        };

        if provider == ReviewProviderKind::Generated && llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self { provider, llm })
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            provider: ReviewProviderKind::Deterministic,
            llm: LlmConfig::default(),
        }
    }
}

/// Chat-completion endpoint settings for generated review content.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_LLM_MODEL.to_string(),
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            temperature: 0.7,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownReviewProvider(String),
    MissingApiKey,
    InvalidMaxTokens,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownReviewProvider(value) => write!(
                f,
                "APP_REVIEW_PROVIDER must be 'deterministic' or 'generated' (got '{value}')"
            ),
            ConfigError::MissingApiKey => {
                write!(f, "OPENAI_API_KEY is required for the generated review provider")
            }
            ConfigError::InvalidMaxTokens => write!(f, "APP_LLM_MAX_TOKENS must be a valid u32"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::UnknownReviewProvider(_)
            | ConfigError::MissingApiKey
            | ConfigError::InvalidMaxTokens => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_REVIEW_PROVIDER",
            "OPENAI_API_KEY",
            "APP_LLM_MODEL",
            "APP_LLM_ENDPOINT",
            "APP_LLM_MAX_TOKENS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.review.provider, ReviewProviderKind::Deterministic);
        assert_eq!(config.review.llm.model, "gpt-4o-mini");
        assert_eq!(config.review.llm.max_tokens, 4000);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn generated_provider_requires_api_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_REVIEW_PROVIDER", "generated");
        let err = AppConfig::load().expect_err("missing key rejected");
        assert!(matches!(err, ConfigError::MissingApiKey));

        env::set_var("OPENAI_API_KEY", "sk-test");
        let config = AppConfig::load().expect("config loads with key");
        assert_eq!(config.review.provider, ReviewProviderKind::Generated);
        assert!(!format!("{:?}", config.review.llm).contains("sk-test"));
        reset_env();
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_REVIEW_PROVIDER", "oracle");
        match AppConfig::load() {
            Err(ConfigError::UnknownReviewProvider(value)) => assert_eq!(value, "oracle"),
            other => panic!("expected unknown provider error, got {other:?}"),
        }
        reset_env();
    }
}
