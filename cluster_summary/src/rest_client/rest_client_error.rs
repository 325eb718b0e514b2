use reqwest::{Method, StatusCode};

use crate::error_chain_fmt;

/// Why a single request against a single node failed.
#[derive(thiserror::Error)]
pub enum RestClientError {
    #[error("Invalid node address `{0}`: must be an http:// or https:// URL")]
    InvalidUrl(String),
    #[error("Rest client error ({method} {url}): {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(
        "{source}\n\nIf you are using self-signed certificates you can re-run this command with\n\
        the --no-ssl-verify flag. Note however that disabling ssl verification\n\
        means that the connection will be vulnerable to man-in-the-middle attacks.\n\n\
        For the most secure access make sure that you have X.509 certificates set up\n\
        in your cluster and use the --cacert flag to specify the certificate\n\
        authority to trust."
    )]
    UnknownAuthority { source: reqwest::Error },
    #[error("Bad request executing {method} {url} due to {body}")]
    BadRequest {
        method: Method,
        url: String,
        body: String,
    },
    #[error("Authentication error executing \"{method} {url}\" check username and password")]
    Unauthorized { method: Method, url: String },
    #[error("{message}")]
    Forbidden { message: String },
    #[error(
        "Server error {status} while executing \"{method} {url}\" check the server logs for more details"
    )]
    ServerError {
        status: StatusCode,
        method: Method,
        url: String,
    },
    #[error("Received error {status} while executing \"{method} {url}\"")]
    UnexpectedStatus {
        status: StatusCode,
        method: Method,
        url: String,
    },
    #[error("Unable to decode response of {method} {url}: {source}")]
    Decode {
        method: Method,
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unable to use CA certificate `{path}`: {reason}")]
    Certificate { path: String, reason: String },
    #[error("Unable to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl std::fmt::Debug for RestClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl RestClientError {
    /// Classifies a failure to get any response at all.
    pub(crate) fn from_send(method: Method, url: String, source: reqwest::Error) -> Self {
        if is_unknown_authority(&source) {
            Self::UnknownAuthority { source }
        } else {
            Self::Transport {
                method,
                url,
                source,
            }
        }
    }

    /// The HTTP status the server answered with, if it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            Self::ServerError { status, .. } | Self::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Walks the cause chain looking for the TLS layer rejecting the certificate issuer.
fn is_unknown_authority(error: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(cause) = current {
        let text = format!("{:?} {}", cause, cause).to_lowercase();
        if text.contains("unknownissuer") || text.contains("unknown issuer") {
            return true;
        }
        current = cause.source();
    }
    false
}
