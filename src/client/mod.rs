//! HTTP API client helper (test harness)
//!
//! Thin wrapper around `reqwest` that pins a base URI, JSON content type,
//! and a no-store cache policy, then exposes one method per verb. Responses
//! come back unmodified so assertions happen at the call site.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;

use crate::config::{ConfigError, Settings};

const NO_CACHE: &str = "no-cache, no-store, max-age=0, must-revalidate";

/// API client with a fixed base URI and default headers.
pub struct ApiClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl ApiClient {
    /// Client rooted at the given base URL.
    pub fn new(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));

        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    /// Client rooted at the configured `apiUrl`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.require("apiUrl")?))
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET request.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client
            .get(self.url(path))
            .headers(self.headers.clone())
            .send()
            .await
    }

    /// POST request with a JSON body.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> reqwest::Result<Response> {
        self.client
            .post(self.url(path))
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
    }

    /// PUT request with a JSON body.
    pub async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> reqwest::Result<Response> {
        self.client
            .put(self.url(path))
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
    }

    /// PATCH request with a JSON body.
    pub async fn patch_json<T: Serialize>(&self, path: &str, body: &T) -> reqwest::Result<Response> {
        self.client
            .patch(self.url(path))
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
    }

    /// DELETE request.
    pub async fn delete(&self, path: &str) -> reqwest::Result<Response> {
        self.client
            .delete(self.url(path))
            .headers(self.headers.clone())
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_one_slash() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/books"), "http://localhost:8080/books");
        assert_eq!(client.url("books/4"), "http://localhost:8080/books/4");
    }

    #[test]
    fn from_settings_requires_api_url() {
        let settings = Settings::parse("url=http://localhost:8080\n");
        assert!(matches!(
            ApiClient::from_settings(&settings),
            Err(ConfigError::KeyMissing(key)) if key == "apiUrl"
        ));
    }
}
