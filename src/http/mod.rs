//! HTTP surface: routes, handlers, middleware.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → middleware.rs (count request, security headers on the way out)
//!     → server.rs (dispatch: api / probes / metrics)
//!     → static fallback (ServeDir) for everything else
//! ```

pub mod middleware;
pub mod server;

pub use server::{router, AppState};
