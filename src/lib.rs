//! Home pager backend service.
//!
//! Serves the static frontend, exposes liveness/readiness/metrics probes,
//! and lists the cluster's Ingress resources through the Kubernetes API.
//! The Ingress document is forwarded verbatim; this service never interprets
//! its contents.

pub mod config;
pub mod http;
pub mod kube;
pub mod lifecycle;

pub use config::Config;
pub use http::{router, AppState};
