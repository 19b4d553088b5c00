//! Outbound HTTP client construction with explicit TLS policy.
//!
//! Services talking to internal endpoints either trust a deployment CA
//! certificate or, in development, explicitly opt out of verification.
//! Neither being configured is an error; there is no silent fallback.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use svckit::client::build_http_client;
//!
//! let client = build_http_client(Some(Path::new("/etc/ssl/internal-ca.pem")), false)?;
//! let response = client.get("https://keystone.internal/v3").send().await?;
//! ```

use std::path::Path;

use reqwest::{Certificate, Client};
use tracing::warn;

use crate::error::{Result, SvckitError};

/// Build an HTTP client for internal endpoints.
///
/// With `cacert`, the PEM file is loaded and trusted as a root certificate.
/// With `insecure`, certificate verification is disabled entirely (and a
/// warning is logged). With neither, construction fails rather than leaving
/// the TLS policy implicit.
pub fn build_http_client(cacert: Option<&Path>, insecure: bool) -> Result<Client> {
    if let Some(path) = cacert {
        let pem = std::fs::read(path)?;
        let cert = Certificate::from_pem(&pem)?;
        return Ok(Client::builder().add_root_certificate(cert).build()?);
    }

    if insecure {
        warn!("certificate verification disabled for outbound HTTP");
        return Ok(Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?);
    }

    Err(SvckitError::Client(
        "no CA certificate provided and insecure mode not enabled".to_string(),
    ))
}
