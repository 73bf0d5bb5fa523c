use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::errors::{ConfigError, ServiceError};

/// Thin JSON client for the content REST API.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// `base_url` is the API root that resource routes are appended to,
    /// e.g. `http://localhost:3000/api/v1`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = base_url.trim_end_matches('/');
        let parsed =
            Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::InvalidBaseUrl(format!("{base_url}: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}{route}`, with `id` appended as an encoded path segment.
    pub fn endpoint(&self, route: &str, id: Option<&str>) -> Result<Url, ServiceError> {
        let raw = format!("{}{route}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.clone()))?;

        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| ConfigError::InvalidBaseUrl(raw))?
                .pop_if_empty()
                .push(id);
        }

        Ok(url)
    }

    /// `GET` `endpoint` and decode the body. Any non-2xx status is an error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Url,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        debug!(%endpoint, ?query, "Fetching JSON");

        let response = self
            .client
            .get(endpoint.clone())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(ServiceError::HttpStatus {
                code: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ServiceError::Decode {
            context: format!("response from {endpoint}"),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = RestClient::new("http://localhost:3000/api/v1/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api/v1");
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        assert!(matches!(
            RestClient::new("ftp://example.com", Duration::from_secs(1)),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            RestClient::new("not a url", Duration::from_secs(1)),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_encodes_id_segment() {
        let client = RestClient::new("http://localhost:3000/api/v1", Duration::from_secs(1))
            .unwrap();

        let list = client.endpoint("/posts", None).unwrap();
        assert_eq!(list.as_str(), "http://localhost:3000/api/v1/posts");

        let item = client.endpoint("/posts", Some("a b/c")).unwrap();
        assert_eq!(item.as_str(), "http://localhost:3000/api/v1/posts/a%20b%2Fc");
    }
}
