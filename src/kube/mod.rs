//! Kubernetes control-plane access.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     client.rs builds the shared upstream client (optionally CA-pinned)
//!
//! Per request:
//!     ingress.rs reads the service-account token and performs one
//!     authenticated GET against the versioned API path
//!
//! Per readiness probe:
//!     ingress.rs checks cluster env + credential presence (no round trip)
//! ```
//!
//! Credential paths are the fixed in-cluster service-account mount; they are
//! deliberately not configurable.

pub mod client;
pub mod ingress;

pub use client::build_client;
pub use ingress::{fetch_ingresses, fetch_from, is_ready, FetchError};

/// CA certificate for the control plane, mounted only inside a cluster.
pub const CA_CERT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Bearer token presented to the control plane.
pub const TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Ceiling on how much of an upstream response body is ever buffered.
pub const MAX_BODY_BYTES: usize = 4 << 20;
