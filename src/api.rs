//! HTTP client for the job/node info API.
//!
//! Collection endpoints answer with a JSON object keyed by record ID; the
//! single-record endpoints answer with one record. Any network error, non-2xx
//! status or undecodable body is a [`FetchError`], which the surfaces show as
//! one page-wide message.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    CollectionError, JobCollection, JobRecord, NodeCollection, NodeRecord, RecordId,
    ServerConfig,
};

/// Message shown to the operator when a fetch fails.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch data. Please check your connection and try again.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Which job collection to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum JobScope {
    /// Jobs that have not finished
    #[default]
    Active,
    /// Jobs currently running
    Running,
    /// Every job the server knows
    All,
}

impl JobScope {
    fn path(self) -> &'static [&'static str] {
        match self {
            JobScope::Active => &["api", "jobs", "active"],
            JobScope::Running => &["api", "jobs", "running"],
            JobScope::All => &["api", "jobs"],
        }
    }

    /// Parse a scope name from configuration.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "active" => Some(JobScope::Active),
            "running" => Some(JobScope::Running),
            "all" => Some(JobScope::All),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobScope::Active => "active",
            JobScope::Running => "running",
            JobScope::All => "all",
        }
    }
}

/// Read-only client for one dashboard server.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    pub fn new(config: &ServerConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Request {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a same-origin relative link such as a rank link.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> String {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(relative)
            .map_or_else(|_| relative.to_string(), |url| url.to_string())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        tracing::debug!(%url, "fetching");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "server returned an error");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch a job collection, sorted by descending job ID.
    pub async fn fetch_jobs(&self, scope: JobScope) -> Result<JobCollection, FetchError> {
        let payload = self.get_json(self.endpoint(scope.path())).await?;
        let jobs = JobCollection::from_value(&payload)?;
        tracing::info!(scope = scope.as_str(), count = jobs.len(), "fetched jobs");
        Ok(jobs)
    }

    /// Fetch every node, sorted by descending node name.
    pub async fn fetch_nodes(&self) -> Result<NodeCollection, FetchError> {
        let payload = self.get_json(self.endpoint(&["api", "nodes"])).await?;
        let nodes = NodeCollection::from_value(&payload)?;
        tracing::info!(count = nodes.len(), "fetched nodes");
        Ok(nodes)
    }

    pub async fn fetch_job(&self, id: &str) -> Result<JobRecord, FetchError> {
        let payload = self.get_json(self.endpoint(&["api", "job", id])).await?;
        Ok(JobRecord::from_value(RecordId::new(id), &payload))
    }

    pub async fn fetch_node(&self, name: &str) -> Result<NodeRecord, FetchError> {
        let payload = self.get_json(self.endpoint(&["api", "node", name])).await?;
        Ok(NodeRecord::from_value(RecordId::new(name), &payload))
    }
}
