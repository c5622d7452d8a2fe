//! Runtime configuration resolved from the environment.
//!
//! # Responsibilities
//! - Resolve the listen port and upstream timeout once at startup
//! - Fall back to fixed defaults for missing or invalid values
//!
//! Resolution is pure over its inputs so the fallback rules can be tested
//! without touching process state.

use std::time::Duration;

/// Environment variable naming the listen port.
pub const PORT_VAR: &str = "PORT";

/// Environment variable bounding a single upstream request.
pub const TIMEOUT_VAR: &str = "KUBERNETES_TIMEOUT";

const DEFAULT_PORT: &str = "8080";
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable runtime settings, created once and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP listener binds to.
    pub listen_port: String,

    /// Upper bound on a single control-plane request.
    pub upstream_timeout: Duration,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            listen_port: resolve_port(std::env::var(PORT_VAR).ok()),
            upstream_timeout: resolve_timeout(
                std::env::var(TIMEOUT_VAR).ok().as_deref(),
                DEFAULT_UPSTREAM_TIMEOUT,
            ),
        }
    }

    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }
}

fn resolve_port(raw: Option<String>) -> String {
    match raw {
        Some(port) if !port.trim().is_empty() => port.trim().to_string(),
        _ => DEFAULT_PORT.to_string(),
    }
}

/// Accepts a bare positive integer (whole seconds) or a duration string
/// such as `250ms`. Absent, non-positive, and unparsable values all fall
/// back to the supplied default.
fn resolve_timeout(raw: Option<&str>, fallback: Duration) -> Duration {
    let raw = match raw {
        Some(raw) => raw.trim(),
        None => return fallback,
    };
    if raw.is_empty() {
        return fallback;
    }

    if let Ok(seconds) = raw.parse::<i64>() {
        if seconds <= 0 {
            return fallback;
        }
        return Duration::from_secs(seconds as u64);
    }

    match humantime::parse_duration(raw) {
        Ok(parsed) if !parsed.is_zero() => parsed,
        _ => fallback,
    }
}
