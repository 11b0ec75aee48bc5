// Configuration for the grammar service boundary, read from the environment.

use std::time::Duration;

use crate::error::CheckError;

/// Default LanguageTool server (the free public instance).
pub const DEFAULT_LANGUAGETOOL_URL: &str = "https://api.languagetool.org";

/// Default Hugging Face inference endpoint for the correction model.
pub const DEFAULT_HF_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/prithivida/grammar_error_correcter_v1";

/// Default address for `cucua-serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default request language for the command-line tools.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default timeout for upstream HTTP calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration.
///
/// Environment variables:
/// - `CUCUA_LANGUAGETOOL_URL`
/// - `CUCUA_HF_API_KEY` (falls back to `HF_API_KEY`)
/// - `CUCUA_HF_MODEL_URL`
/// - `CUCUA_HTTP_TIMEOUT_SECS`
/// - `CUCUA_BIND`
/// - `CUCUA_LANGUAGE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the LanguageTool server, without `/v2/check`.
    pub languagetool_url: String,

    /// API key for the correction model. Only needed for correction.
    pub hf_api_key: Option<String>,

    pub hf_model_url: String,

    pub timeout: Duration,

    pub bind: String,

    pub default_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languagetool_url: DEFAULT_LANGUAGETOOL_URL.to_string(),
            hf_api_key: None,
            hf_model_url: DEFAULT_HF_MODEL_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind: DEFAULT_BIND.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self, CheckError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(url) = get("CUCUA_LANGUAGETOOL_URL") {
            config.languagetool_url = url.trim_end_matches('/').to_string();
        }
        config.hf_api_key = get("CUCUA_HF_API_KEY").or_else(|| get("HF_API_KEY"));
        if let Some(url) = get("CUCUA_HF_MODEL_URL") {
            config.hf_model_url = url;
        }
        if let Some(secs) = get("CUCUA_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                CheckError::Config(format!("CUCUA_HTTP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(bind) = get("CUCUA_BIND") {
            config.bind = bind;
        }
        if let Some(language) = get("CUCUA_LANGUAGE") {
            config.default_language = language;
        }

        Ok(config)
    }

    /// Build a blocking HTTP client with the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client, CheckError> {
        Ok(reqwest::blocking::Client::builder()
            .user_agent(concat!("cucua/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()?)
    }
}
