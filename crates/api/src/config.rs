use std::str::FromStr;
use std::time::Duration;

use ethix_db::RestStoreConfig;
use ethix_llm::OpenAiConfig;
use ethix_pipeline::batch::DEFAULT_BATCH_CONCURRENCY;
use ethix_pipeline::RetryPolicy;

/// A configuration value is missing or cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where company records are persisted.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// Hosted PostgREST table.
    Rest(RestStoreConfig),
    /// Process-local, empty at startup. Local development only.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// Secrets (API key, store key, model key) are carried here and handed to
/// the clients that need them; never log the whole struct.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Shared secret for protected routes. `None` makes them answer 500.
    pub api_key: Option<String>,
    pub store: StoreBackend,
    pub model: OpenAiConfig,
    /// Retry policy for transient store and model failures.
    pub retry: RetryPolicy,
    /// Companies rescored concurrently by the batch endpoint.
    pub batch_concurrency: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                     |
    /// |--------------------------------|-----------------------------|
    /// | `HOST`                         | `0.0.0.0`                   |
    /// | `PORT`                         | `3000`                      |
    /// | `REQUEST_TIMEOUT_SECS`         | `60`                        |
    /// | `API_KEY`                      | unset                       |
    /// | `STORE_BACKEND`                | `rest`                      |
    /// | `STORE_URL` / `SUPABASE_URL`   | required for `rest`         |
    /// | `STORE_KEY` / `SUPABASE_KEY`   | required for `rest`         |
    /// | `STORE_TABLE`                  | `companies`                 |
    /// | `STORE_TIMEOUT_SECS`           | `10`                        |
    /// | `OPENAI_API_KEY`               | required                    |
    /// | `MODEL_BASE_URL`               | `https://api.openai.com/v1` |
    /// | `MODEL_NAME`                   | `gpt-3.5-turbo`             |
    /// | `MODEL_MAX_TOKENS`             | `200`                       |
    /// | `MODEL_TEMPERATURE`            | `0.2`                       |
    /// | `MODEL_TIMEOUT_SECS`           | `30`                        |
    /// | `SCORING_MAX_RETRIES`          | `2`                         |
    /// | `SCORING_RETRY_BASE_MS`        | `500`                       |
    /// | `BATCH_CONCURRENCY`            | `4`                         |
    /// | `LOG_FORMAT`                   | `text`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.string("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = env.parse("PORT", 3000)?;
        let request_timeout_secs: u64 = env.parse("REQUEST_TIMEOUT_SECS", 60)?;
        let api_key = env.string("API_KEY");

        let store = match env.string("STORE_BACKEND").as_deref() {
            None | Some("rest") => {
                let url = env
                    .string("STORE_URL")
                    .or_else(|| env.string("SUPABASE_URL"))
                    .ok_or(ConfigError::Missing("STORE_URL"))?;
                let key = env
                    .string("STORE_KEY")
                    .or_else(|| env.string("SUPABASE_KEY"))
                    .ok_or(ConfigError::Missing("STORE_KEY"))?;

                let mut rest = RestStoreConfig::new(url, key);
                if let Some(table) = env.string("STORE_TABLE") {
                    rest.table = table;
                }
                rest.timeout =
                    Duration::from_secs(env.parse("STORE_TIMEOUT_SECS", rest.timeout.as_secs())?);
                StoreBackend::Rest(rest)
            }
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected 'rest' or 'memory'".into(),
                })
            }
        };

        let mut model = OpenAiConfig::new(
            env.string("OPENAI_API_KEY")
                .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
        );
        if let Some(base_url) = env.string("MODEL_BASE_URL") {
            model.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(name) = env.string("MODEL_NAME") {
            model.model = name;
        }
        model.max_tokens = env.parse("MODEL_MAX_TOKENS", model.max_tokens)?;
        model.temperature = env.parse("MODEL_TEMPERATURE", model.temperature)?;
        model.timeout =
            Duration::from_secs(env.parse("MODEL_TIMEOUT_SECS", model.timeout.as_secs())?);

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_retries: env.parse("SCORING_MAX_RETRIES", defaults.max_retries)?,
            base_delay: Duration::from_millis(env.parse(
                "SCORING_RETRY_BASE_MS",
                defaults.base_delay.as_millis() as u64,
            )?),
        };

        let batch_concurrency: usize =
            env.parse("BATCH_CONCURRENCY", DEFAULT_BATCH_CONCURRENCY)?;
        if batch_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "BATCH_CONCURRENCY",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let log_format = match env.string("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected 'text' or 'json'".into(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            api_key,
            store,
            model,
            retry,
            batch_concurrency,
            log_format,
        })
    }
}

/// Environment reader. Blank values count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        }
    }
}
