//! Outbound client bootstrap.
//!
//! The control plane presents a certificate signed by the cluster's private
//! CA, mounted at a well-known path inside pods. When that file is readable
//! the client trusts only that CA; otherwise it falls back to the platform
//! trust store so the service still starts outside a cluster.

use std::time::Duration;

use reqwest::{Certificate, Client};

use crate::kube::CA_CERT_PATH;

/// Build the shared upstream client.
///
/// Called exactly once at startup. The returned client owns its connection
/// pool and is cloned (cheaply, by reference count) wherever a fetch is
/// made; it is never rebuilt mid-process.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().timeout(timeout);

    match std::fs::read(CA_CERT_PATH) {
        Ok(pem) => match Certificate::from_pem(&pem) {
            Ok(ca) => {
                tracing::info!(path = CA_CERT_PATH, "pinned control-plane CA certificate");
                builder = builder
                    .tls_built_in_root_certs(false)
                    .add_root_certificate(ca);
            }
            Err(error) => {
                tracing::warn!(%error, "could not parse CA cert, using default trust roots");
            }
        },
        Err(error) => {
            tracing::warn!(%error, "could not read CA cert (running outside cluster?)");
        }
    }

    builder.build()
}
