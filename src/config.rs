use std::time::Duration;

use url::Url;

pub const DEFAULT_MODEL: &str = "llama-3.2-11b-vision-preview";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Process-level settings, resolved once at startup and injected into the
/// extractor. Per-call options take precedence over these.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub bind_addr: String,
    pub allow_local_files: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            allow_local_files: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let base_url = match get("GROQ_BASE_URL") {
            Some(raw) => validate_base_url("GROQ_BASE_URL", &raw)?,
            None => defaults.base_url,
        };

        let request_timeout = match get("GROQ_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: "GROQ_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_key: get("GROQ_API_KEY"),
            model: get("GROQ_MODEL").unwrap_or(defaults.model),
            base_url,
            request_timeout,
            bind_addr: get("VISION_OCR_BIND").unwrap_or(defaults.bind_addr),
            allow_local_files: get("VISION_OCR_ALLOW_LOCAL_FILES").as_deref() == Some("1"),
        })
    }
}

fn validate_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
        assert!(!cfg.allow_local_files);
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("GROQ_MODEL", "other-vision"),
            ("GROQ_BASE_URL", "http://localhost:9000/v1/"),
            ("GROQ_TIMEOUT_SECS", "5"),
            ("VISION_OCR_ALLOW_LOCAL_FILES", "1"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(cfg.model, "other-vision");
        assert_eq!(cfg.base_url, "http://localhost:9000/v1");
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert!(cfg.allow_local_files);
    }

    #[test]
    fn blank_api_key_is_unset() {
        let cfg = Config::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("GROQ_BASE_URL", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("GROQ_BASE_URL", "ftp://host/v1")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("GROQ_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }
}
