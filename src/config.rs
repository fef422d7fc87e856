//! Configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honoured when present.

use std::env;
use std::time::Duration;

use crate::backend::{GeminiClient, GeminiModel};
use crate::error::{DoctorError, Result};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "VIRTUAL_DOCTOR_MODEL";
pub const BASE_URL_VAR: &str = "VIRTUAL_DOCTOR_BASE_URL";
pub const TIMEOUT_VAR: &str = "VIRTUAL_DOCTOR_TIMEOUT_SECS";
pub const TEMPERATURE_VAR: &str = "VIRTUAL_DOCTOR_TEMPERATURE";

#[derive(Debug, Clone)]
pub struct DoctorConfig {
    /// Google AI Studio key; only required when talking to Gemini
    pub api_key: Option<String>,
    pub model: GeminiModel,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub temperature: f32,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: None,
            timeout: None,
            temperature: 1.0,
        }
    }
}

impl DoctorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match non_empty(TIMEOUT_VAR) {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                DoctorError::ConfigError(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    TIMEOUT_VAR, raw
                ))
            })?)),
            None => None,
        };

        let temperature = match non_empty(TEMPERATURE_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                DoctorError::ConfigError(format!("{} must be a number, got {:?}", TEMPERATURE_VAR, raw))
            })?,
            None => defaults.temperature,
        };

        Ok(Self {
            api_key: non_empty(API_KEY_VAR).or_else(|| non_empty(FALLBACK_API_KEY_VAR)),
            model: non_empty(MODEL_VAR)
                .map(GeminiModel::from_string)
                .unwrap_or(defaults.model),
            base_url: non_empty(BASE_URL_VAR),
            timeout,
            temperature,
        })
    }

    /// Build a Gemini client from this configuration.
    pub fn gemini_client(&self) -> Result<GeminiClient> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            DoctorError::ConfigError(format!(
                "{} (or {}) is required to talk to Gemini",
                API_KEY_VAR, FALLBACK_API_KEY_VAR
            ))
        })?;

        let mut client = GeminiClient::new(api_key)?
            .model(self.model.clone())
            .temperature(self.temperature);
        if let Some(base_url) = &self.base_url {
            client = client.base_url(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        Ok(client)
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = DoctorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, GeminiModel::Gemini15Flash);
        assert_eq!(config.timeout, None);
        assert_eq!(config.temperature, 1.0);
    }

    #[test]
    fn reads_every_variable() {
        let config = DoctorConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "abc"),
            (MODEL_VAR, "models/gemini-2.5-flash"),
            (BASE_URL_VAR, "http://localhost:8080/v1beta"),
            (TIMEOUT_VAR, " 30 "),
            (TEMPERATURE_VAR, "0.3"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model, GeminiModel::Gemini25Flash);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1beta"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.temperature, 0.3);
    }

    #[test]
    fn falls_back_to_gemini_api_key() {
        let config =
            DoctorConfig::from_lookup(lookup(&[(API_KEY_VAR, ""), (FALLBACK_API_KEY_VAR, "xyz")]))
                .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("xyz"));
    }

    #[test]
    fn rejects_malformed_timeout() {
        let err = DoctorConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, DoctorError::ConfigError(_)));
    }

    #[test]
    fn gemini_client_requires_api_key() {
        let err = DoctorConfig::default().gemini_client().unwrap_err();
        assert!(matches!(err, DoctorError::ConfigError(_)));

        let config = DoctorConfig {
            api_key: Some("key".into()),
            model: GeminiModel::Gemini20Flash,
            ..DoctorConfig::default()
        };
        let client = config.gemini_client().unwrap();
        assert_eq!(client.config().model, GeminiModel::Gemini20Flash);
    }
}
