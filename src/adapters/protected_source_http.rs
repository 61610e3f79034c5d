//! Protected path source fetched over HTTP using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::adapters::protected_list_format::parse_protected_list;
use crate::domain::{AppError, ProtectedSourceConfig};
use crate::ports::ProtectedPathSource;

/// HTTP transport for the protected list.
///
/// This source performs a single request per call. Retry behavior is implemented
/// by a dedicated retry wrapper adapter.
#[derive(Debug, Clone)]
pub struct HttpProtectedSource {
    url: Url,
    client: Client,
}

impl HttpProtectedSource {
    pub fn new(config: &ProtectedSourceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ProtectedSource {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
            })?;

        Ok(Self { url: config.url.clone(), client })
    }
}

impl ProtectedPathSource for HttpProtectedSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    fn fetch(&self) -> Result<Vec<String>, AppError> {
        let response = self.client.get(self.url.clone()).send().map_err(|e| {
            AppError::ProtectedSource { message: format!("HTTP request failed: {}", e), status: None }
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| AppError::ProtectedSource {
            message: format!("Failed to read response body: {}", e),
            status: Some(status.as_u16()),
        })?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                format!("{} returned {}", self.url, status)
            } else {
                body.trim().to_string()
            };
            return Err(AppError::ProtectedSource { message, status: Some(status.as_u16()) });
        }

        parse_protected_list(&body)
            .map_err(|message| AppError::ProtectedSource { message, status: Some(status.as_u16()) })
    }
}
