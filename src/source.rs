use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::config::RenderConfig;
use crate::error::ChartError;
use crate::logging::{log_fetch, v_str, ProfileScope};

/// Where a JSON document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Http(Url),
}

impl Source {
    /// `http://` and `https://` strings become URLs, anything else a path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Http(url),
            _ => Source::File(PathBuf::from(s)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Http(url) => write!(f, "{}", url),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::parse(s)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fetches documents from files or over HTTP, each bounded by a timeout.
#[derive(Clone)]
pub struct DocumentFetcher {
    client: Client,
    timeout: Duration,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration, use_system_proxy: bool) -> Result<Self, ChartError> {
        let mut builder = Client::builder().timeout(timeout);
        if !use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ChartError::load("http client", e))?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(cfg: &RenderConfig) -> Result<Self, ChartError> {
        Self::new(cfg.fetch_timeout(), cfg.use_system_proxy)
    }

    pub async fn fetch_bytes(&self, source: &Source) -> Result<Vec<u8>, ChartError> {
        let _scope = ProfileScope::with_context("fetch", &[("source", v_str(&source.to_string()))]);
        match tokio::time::timeout(self.timeout, self.read(source)).await {
            Ok(result) => result,
            Err(_) => Err(ChartError::load(
                source.to_string(),
                format!("timed out after {:?}", self.timeout),
            )),
        }
    }

    async fn read(&self, source: &Source) -> Result<Vec<u8>, ChartError> {
        let fail = |e: &dyn ToString| ChartError::load(source.to_string(), e.to_string());
        match source {
            Source::File(path) => tokio::fs::read(path).await.map_err(|e| fail(&e)),
            Source::Http(url) => {
                let resp = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| fail(&e))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(fail(&format!("http status {}", status.as_u16())));
                }
                let body = resp.bytes().await.map_err(|e| fail(&e))?;
                Ok(body.to_vec())
            }
        }
    }

    /// Fetch and parse; malformed JSON is a load failure, not a schema one.
    pub async fn fetch_json(&self, source: &Source) -> Result<Value, ChartError> {
        let bytes = self.fetch_bytes(source).await?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ChartError::load(source.to_string(), e))?;
        log_fetch(&source.to_string(), bytes.len(), &sha256_hex(&bytes));
        Ok(value)
    }
}
