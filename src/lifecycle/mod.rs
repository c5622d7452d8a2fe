//! Service lifecycle: Starting → Serving → Draining → Stopped.
//!
//! # Design Decisions
//! - The listener is bound by the caller, so a bind failure is fatal before
//!   any traffic is accepted and shutdown can never begin pre-bind.
//! - The serve loop runs on a spawned task; the main task waits on either a
//!   fatal serve error or a termination signal, whichever comes first.
//! - The drain is bounded; drain errors and timeouts are logged, never
//!   escalated.

pub mod signals;

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Upper bound on the graceful drain.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Serve until a fatal error or a termination signal (SIGINT/SIGTERM).
pub async fn run(listener: TcpListener, app: Router) -> io::Result<()> {
    run_with_shutdown(listener, app, signals::shutdown_signal()).await
}

/// Like [`run`], with the termination trigger supplied by the caller.
pub async fn run_with_shutdown(
    listener: TcpListener,
    app: Router,
    terminate: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    // The drain request has exactly one consumer: the serve task's graceful
    // shutdown future.
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // The serve loop only returns on its own for a fatal listener
            // error; nothing has requested a drain yet.
            return match result {
                Ok(serve_result) => serve_result,
                Err(join_error) => Err(io::Error::other(join_error)),
            };
        }
        _ = terminate => {
            tracing::info!("termination requested, draining");
        }
    }

    let _ = drain_tx.send(());
    match tokio::time::timeout(DRAIN_TIMEOUT, &mut server).await {
        Ok(Ok(Ok(()))) => tracing::info!("drain complete"),
        Ok(Ok(Err(error))) => tracing::warn!(%error, "error while draining"),
        Ok(Err(join_error)) => tracing::warn!(%join_error, "serve task failed while draining"),
        Err(_) => {
            tracing::warn!(timeout = ?DRAIN_TIMEOUT, "drain timed out, aborting in-flight requests");
            server.abort();
        }
    }

    Ok(())
}
