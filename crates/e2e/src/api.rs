//! HTTP client for the REST API suite
//!
//! Only request plumbing lives here: base address, JSON headers, the
//! `x-api-key` credential and a request timeout. Response checks belong to
//! the tests that use it.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::error::{HarnessError, HarnessResult};

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> HarnessResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !api_key.is_empty() {
            let mut key = HeaderValue::from_str(api_key)
                .map_err(|e| HarnessError::Config(format!("invalid API key: {}", e)))?;
            key.set_sensitive(true);
            headers.insert(API_KEY_HEADER, key);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: Url::parse(base_url)?,
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> HarnessResult<Self> {
        Self::new(&settings.api_base_url, &settings.api_key, settings.default_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> HarnessResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn get(&self, path: &str) -> HarnessResult<Response> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> HarnessResult<Response> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> HarnessResult<Response> {
        let url = self.url(path)?;
        debug!("PUT {}", url);
        Ok(self.client.put(url).json(body).send().await?)
    }

    pub async fn patch_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> HarnessResult<Response> {
        let url = self.url(path)?;
        debug!("PATCH {}", url);
        Ok(self.client.patch(url).json(body).send().await?)
    }

    pub async fn delete(&self, path: &str) -> HarnessResult<Response> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);
        Ok(self.client.delete(url).send().await?)
    }

    pub async fn head(&self, path: &str) -> HarnessResult<Response> {
        let url = self.url(path)?;
        debug!("HEAD {}", url);
        Ok(self.client.head(url).send().await?)
    }
}

/// Whether `url` answers at all within `timeout`; any HTTP status counts
pub async fn is_reachable(url: &str, timeout: Duration) -> bool {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Cannot build HTTP client: {}", e);
            return false;
        }
    };

    match client.get(url).send().await {
        Ok(resp) => {
            debug!("{} answered {}", url, resp.status());
            true
        }
        Err(e) => {
            if !e.is_connect() {
                warn!("{} unreachable: {}", url, e);
            }
            false
        }
    }
}
