use std::{fs::File, io::Read, time::Duration};

use tracing::instrument;
use url::Url;

use crate::{cluster_target::ClusterTarget, RestClient, RestClientError};

/// Collects the TLS and timeout settings shared by every node request of a run.
#[derive(Debug, Default, Clone)]
pub struct RestClientBuilder {
    accept_invalid_certs: bool,
    ca_certificate_path: Option<String>,
    timeout: Option<Duration>,
}

impl RestClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips certificate verification. Leaves the connection open to man-in-the-middle attacks.
    pub fn set_accept_invalid_certs(mut self, accept: bool) -> Self {
        if accept {
            tracing::warn!("TLS certificate verification is disabled");
        }
        self.accept_invalid_certs = accept;
        self
    }

    /// Trusts the PEM encoded certificate authority at `certificate_path` in addition to the
    /// built in roots.
    pub fn set_ca_certificate(mut self, certificate_path: &str) -> Self {
        self.ca_certificate_path = Some(certificate_path.to_string());
        self
    }

    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the shared connection pool. Call once per run and hand out clients from it.
    #[instrument(level = "debug", name = "Build RestClientBuilder", skip(self))]
    pub fn build(&self) -> Result<RestClientPool, RestClientError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(path) = &self.ca_certificate_path {
            builder = builder.add_root_certificate(read_certificate(path)?);
        }

        let http = builder.build().map_err(|e| {
            tracing::error!("Unable to build HTTP client. Caused by: {}", e);
            RestClientError::ClientBuild(e)
        })?;

        Ok(RestClientPool { http })
    }
}

fn read_certificate(path: &str) -> Result<reqwest::Certificate, RestClientError> {
    let failed = |reason: String| {
        tracing::error!("CA certificate `{}` rejected: {}", path, reason);
        RestClientError::Certificate {
            path: path.to_string(),
            reason,
        }
    };

    let mut buf = Vec::new();
    File::open(path)
        .map_err(|e| failed(format!("Failed to open certificate file. Caused by: {}", e)))?
        .read_to_end(&mut buf)
        .map_err(|e| failed(format!("File was opened but unable to read. Caused by: {}", e)))?;

    reqwest::Certificate::from_pem(&buf)
        .map_err(|e| failed(format!("Invalid pem file. Caused by: {}", e)))
}

/// Owns the reqwest connection pool and hands out per-node clients bound to credentials.
#[derive(Debug, Clone)]
pub struct RestClientPool {
    http: reqwest::Client,
}

impl RestClientPool {
    /// Returns a client for `node` that authenticates as `target`.
    ///
    /// Fails with [`RestClientError::InvalidUrl`] when `node` is not an http(s) URL.
    pub fn client_for(
        &self,
        node: &str,
        target: &ClusterTarget,
    ) -> Result<RestClient, RestClientError> {
        let base_url = validate_node_address(node)?;
        Ok(RestClient::new(
            self.http.clone(),
            base_url,
            target.login.clone(),
            target.pass.clone(),
        ))
    }
}

/// Checks `node` is an absolute http or https URL and returns it without a trailing slash.
fn validate_node_address(node: &str) -> Result<String, RestClientError> {
    let url = Url::parse(node).map_err(|_| RestClientError::InvalidUrl(node.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(node.trim_end_matches('/').to_string()),
        _ => Err(RestClientError::InvalidUrl(node.to_string())),
    }
}
