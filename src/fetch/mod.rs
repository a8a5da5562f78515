// src/fetch/mod.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{Config, RetryPolicy};
use crate::error::PipelineError;

pub mod retry;

pub use retry::{retry_linear, AttemptFailure};

pub const SPARQL_JSON: &str = "application/sparql-results+json";

/// Unparsed response body from the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult(pub String);

/// Anything that can answer a query with a raw result envelope.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<RawResult, PipelineError>;
}

/// HTTP client for a SPARQL endpoint with timeout and linear-backoff retry.
pub struct SparqlClient {
    client: Client,
    endpoint: Url,
    policy: RetryPolicy,
}

impl SparqlClient {
    pub fn new(endpoint: Url, user_agent: &str, policy: RetryPolicy) -> Result<Self> {
        let client = Self::client_builder(user_agent, &policy)
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_client(client, endpoint, policy))
    }

    /// Builder with the identifying header and request timeout already set.
    pub fn client_builder(user_agent: &str, policy: &RetryPolicy) -> ClientBuilder {
        Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(policy.timeout)
    }

    pub fn with_client(client: Client, endpoint: Url, policy: RetryPolicy) -> Self {
        Self {
            client,
            endpoint,
            policy,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.endpoint.clone(), &cfg.user_agent, cfg.retry)
    }

    async fn attempt(&self, query: &str, attempt: u32) -> Result<RawResult, AttemptFailure> {
        debug!(attempt, endpoint = %self.endpoint, "sending query");
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&[("query", query), ("format", "json")])
            .header(header::ACCEPT, SPARQL_JSON)
            .send()
            .await
            .map_err(AttemptFailure::transport)?;

        let status = resp.status();
        // body read errors count as transient too
        let body = resp.text().await.map_err(AttemptFailure::transport)?;
        if status == StatusCode::OK {
            Ok(RawResult(body))
        } else {
            Err(AttemptFailure::status(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl ResultSource for SparqlClient {
    #[instrument(level = "info", skip(self, query), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, query: &str) -> Result<RawResult, PipelineError> {
        let raw = retry_linear(&self.policy, |attempt| self.attempt(query, attempt)).await?;
        info!(bytes = raw.0.len(), "query answered");
        Ok(raw)
    }
}
