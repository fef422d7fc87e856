use crate::error::{DoctorError, Result};
use reqwest::Response;
use tracing::error;

/// Convert a reqwest error to a DoctorError, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> DoctorError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        DoctorError::Timeout
    } else {
        DoctorError::HttpError(e)
    }
}

/// Check HTTP response status and extract error message if unsuccessful.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(DoctorError::ApiError(format!(
            "{} API error ({}): {}",
            provider_name, status, error_text
        )));
    }
    Ok(response)
}

/// Macro to generate standard builder methods for model clients.
///
/// Generates `model()`, `temperature()`, `max_tokens()`, `timeout()` and
/// `base_url()` for a client holding `config` and a `reqwest::Client`.
#[macro_export]
macro_rules! impl_client_builder_methods {
    (
        client_type: $client:ty,
        model_type: $model:ty,
        provider_name: $provider:expr
    ) => {
        impl $client {
            /// Set the model to use
            #[tracing::instrument(skip(self))]
            pub fn model(mut self, model: $model) -> Self {
                tracing::debug!(
                    previous_model = ?self.config.model,
                    new_model = ?model,
                    "Setting {} model", $provider
                );
                self.config.model = model;
                self
            }

            /// Set the sampling temperature
            #[tracing::instrument(skip(self))]
            pub fn temperature(mut self, temp: f32) -> Self {
                tracing::debug!(
                    previous_temp = self.config.temperature,
                    new_temp = temp,
                    "Setting temperature"
                );
                self.config.temperature = temp;
                self
            }

            /// Set the maximum tokens to generate
            #[tracing::instrument(skip(self))]
            pub fn max_tokens(mut self, max: u32) -> Self {
                tracing::debug!(
                    previous_max = ?self.config.max_tokens,
                    new_max = max,
                    "Setting max_tokens"
                );
                // At least 1, the API rejects 0
                self.config.max_tokens = Some(max.max(1));
                self
            }

            /// Set the timeout for HTTP requests.
            ///
            /// Without a timeout a hung request hangs the whole turn.
            #[tracing::instrument(skip(self))]
            pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
                tracing::debug!(
                    previous_timeout = ?self.config.timeout,
                    new_timeout = ?timeout,
                    "Setting timeout"
                );
                self.config.timeout = Some(timeout);

                self.client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .unwrap_or_else(|e| {
                        tracing::warn!(
                            error = %e,
                            "Failed to build reqwest client with timeout, using default"
                        );
                        reqwest::Client::new()
                    });

                self
            }

            /// Set a custom base URL (without trailing slash).
            #[tracing::instrument(skip(self, base_url))]
            pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
                let base_url = base_url.into();
                tracing::debug!(
                    previous_base_url = ?self.config.base_url,
                    new_base_url = %base_url,
                    "Setting custom base URL"
                );
                self.config.base_url = Some(base_url);
                self
            }
        }
    };
}
