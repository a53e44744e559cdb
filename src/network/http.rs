//! HTTP Network
//!
//! Forwards fetches to an upstream origin with reqwest.

use async_trait::async_trait;
use axum::http::header::HOST;
use reqwest::Client;
use tracing::debug;

use super::message::{is_hop_by_hop, FetchRequest, FetchResponse};
use super::Network;
use crate::error::Result;

/// Network backed by a single upstream origin.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: Client,
    upstream: String,
}

impl HttpNetwork {
    pub fn new(upstream: impl Into<String>) -> Self {
        let upstream = upstream.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            upstream,
        }
    }

    /// Resolves a request URL against the upstream origin.
    ///
    /// Absolute URLs are used unchanged.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.upstream, url)
        } else {
            format!("{}/{}", self.upstream, url)
        }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let target = self.resolve(&request.url);
        debug!("Fetching {} {}", request.method, target);

        let mut builder = self.client.request(request.method.clone(), &target);
        for (name, value) in request.headers.iter() {
            if *name == HOST || is_hop_by_hop(name.as_str()) {
                continue;
            }
            builder = builder.header(name.clone(), value.clone());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !is_hop_by_hop(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        debug!("Fetched {} -> {}", target, status);

        Ok(FetchResponse {
            status,
            headers,
            body,
            url: request.url.clone(),
        })
    }
}
