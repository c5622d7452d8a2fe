//! Ingress listing via the control-plane API.
//!
//! # Responsibilities
//! - Detect cluster presence from the kubelet-injected environment
//! - Read the service-account token per fetch
//! - Perform one bounded, authenticated GET per inbound request (no retries)
//! - Translate non-success responses into typed errors
//!
//! The fetched document is opaque: it is decoded only to re-encode it for
//! the caller, key order preserved.

use std::path::Path;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

use crate::kube::{MAX_BODY_BYTES, TOKEN_PATH};

const HOST_VAR: &str = "KUBERNETES_SERVICE_HOST";
const PORT_VAR: &str = "KUBERNETES_SERVICE_PORT";
const INGRESS_LIST_PATH: &str = "/apis/networking.k8s.io/v1/ingresses";

/// Errors from a single listing attempt. All are request-scoped; none
/// affect subsequent requests or process health.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service-account token could not be read.
    #[error("failed to read service account token: {0}")]
    Token(#[from] std::io::Error),

    /// Network failure or deadline exceeded talking to the control plane.
    #[error("kubernetes api request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status from the control plane, with a bounded body
    /// excerpt.
    #[error("kubernetes api error: {status} {excerpt}")]
    Api { status: StatusCode, excerpt: String },

    /// The control plane returned a payload that is not valid JSON.
    #[error("kubernetes api returned malformed json: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetch the cluster-wide ingress list.
///
/// Outside a cluster (no kubelet-injected service env) this degrades to an
/// empty list rather than an error, without touching the network.
pub async fn fetch_ingresses(client: &Client) -> Result<Value, FetchError> {
    let (host, port) = match cluster_env() {
        Some(addr) => addr,
        None => return Ok(json!({ "items": [] })),
    };

    let token = tokio::fs::read_to_string(TOKEN_PATH).await?;
    let url = format!("https://{host}:{port}{INGRESS_LIST_PATH}");
    fetch_from(client, &url, token.trim()).await
}

/// Issue the authenticated GET and decode the response.
///
/// Split from [`fetch_ingresses`] so tests can point it at a local mock
/// upstream instead of the in-cluster address.
pub async fn fetch_from(client: &Client, url: &str, token: &str) -> Result<Value, FetchError> {
    let mut response = client.get(url).bearer_auth(token).send().await?;

    let status = response.status();
    let body = read_capped(&mut response).await?;

    if !status.is_success() {
        let excerpt = String::from_utf8_lossy(&body).trim().to_string();
        return Err(FetchError::Api { status, excerpt });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Buffer at most [`MAX_BODY_BYTES`] of the response body.
///
/// The remainder of an oversized body is never read; dropping the response
/// releases the connection.
async fn read_capped(response: &mut reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if buf.len() + chunk.len() >= MAX_BODY_BYTES {
            buf.extend_from_slice(&chunk[..MAX_BODY_BYTES - buf.len()]);
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Local readiness check: credentials only, no round trip to the API.
///
/// Outside a cluster the service is always ready. In-cluster, readiness
/// means the token file exists and is non-empty after trimming; upstream
/// reachability is deliberately not probed, so this service's readiness
/// does not track control-plane availability or latency.
pub async fn is_ready() -> bool {
    if cluster_env().is_none() {
        return true;
    }
    token_present(Path::new(TOKEN_PATH)).await
}

async fn token_present(path: &Path) -> bool {
    match tokio::fs::read_to_string(path).await {
        Ok(token) => !token.trim().is_empty(),
        Err(_) => false,
    }
}

/// Control-plane host and port injected by the kubelet, if any.
fn cluster_env() -> Option<(String, String)> {
    let host = non_empty_var(HOST_VAR)?;
    let port = non_empty_var(PORT_VAR)?;
    Some((host, port))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
