use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::service::{QueryService, ServiceError};
use super::types::{HealthResponse, QueryResponse};

/// HTTP client for the query backend.
///
/// # Example
/// ```no_run
/// use querydesk::api::{HttpQueryService, QueryService};
/// use std::time::Duration;
///
/// # async fn demo() {
/// let service = HttpQueryService::new("http://localhost:5000".to_string(), Duration::from_secs(60));
/// match service.query("what is in my drive?").await {
///     Ok(text) => println!("{text}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// # }
/// ```
pub struct HttpQueryService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpQueryService {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET and decodes the JSON body, mapping every failure to `ServiceError`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        debug!("GET {} -> {}", url, response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error: {} - {}", status, body);
            return Err(ServiceError::Status { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn query(&self, query: &str) -> Result<String, ServiceError> {
        info!("Sending query ({} bytes)", query.len());
        let parsed: QueryResponse = self.get_json("/api/query", &[("q", query)]).await?;
        info!("Query answered ({} bytes)", parsed.response.len());
        Ok(parsed.response)
    }

    async fn health(&self) -> Result<String, ServiceError> {
        let parsed: HealthResponse = self.get_json("/api/", &[]).await?;
        if parsed.is_ok() {
            Ok(parsed.message)
        } else {
            Err(ServiceError::Status {
                status: 200,
                body: format!("status={} {}", parsed.status, parsed.message),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let service = HttpQueryService::new("http://localhost:5000/".to_string(), Duration::from_secs(1));
        assert_eq!(service.base_url(), "http://localhost:5000");
    }
}
