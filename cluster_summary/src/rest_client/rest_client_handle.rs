use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::instrument;

use crate::{
    pools::{PoolsDefaultInfo, PoolsInfo},
    RestClientError,
};

/// Authenticated client for the management API of one node.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: String,
        username: String,
        password: String,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
        }
    }

    /// `GET /pools`: version, edition and cluster uuid.
    pub async fn get_pools(&self) -> Result<PoolsInfo, RestClientError> {
        self.get_json("/pools").await
    }

    /// `GET /pools/default`: cluster settings, storage totals and per-node details.
    pub async fn get_pools_default(&self) -> Result<PoolsDefaultInfo, RestClientError> {
        self.get_json("/pools/default").await
    }

    /// Performs an authenticated GET of `path` and decodes the body as JSON.
    #[instrument(
        level = "debug",
        name = "Rest Client - GET",
        skip(self),
        fields(node = %self.base_url)
    )]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RestClientError> {
        let url = format!("{}{}", self.base_url, path);
        let method = Method::GET;

        let response = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| RestClientError::from_send(method.clone(), url.clone(), e))?;

        let status = response.status();
        tracing::debug!("{} {} {}", method, url, status);

        if !matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
        ) {
            let body = response.bytes().await.ok();
            return Err(classify_status(status, method, url, body.as_deref()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RestClientError::from_send(method.clone(), url.clone(), e))?;

        serde_json::from_slice::<T>(&body).map_err(|source| RestClientError::Decode {
            method,
            url,
            source,
        })
    }
}

/// Shape of the body the server sends with a 403.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForbiddenBody {
    message: String,
    permissions: Vec<String>,
}

/// Maps a non-success status to the matching error.
fn classify_status(
    status: StatusCode,
    method: Method,
    url: String,
    body: Option<&[u8]>,
) -> RestClientError {
    match status {
        StatusCode::BAD_REQUEST => {
            let body = body
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_else(|| "<no body>".to_string());
            RestClientError::BadRequest { method, url, body }
        }
        StatusCode::UNAUTHORIZED => RestClientError::Unauthorized { method, url },
        StatusCode::FORBIDDEN => {
            let message = body
                .and_then(|b| serde_json::from_slice::<ForbiddenBody>(b).ok())
                .filter(|data| !data.message.is_empty() || !data.permissions.is_empty())
                .map(|data| format!("{}: {}", data.message, data.permissions.join(", ")))
                .unwrap_or_else(|| format!("Forbidden executing \"{} {}\"", method, url));
            RestClientError::Forbidden { message }
        }
        s if s.is_server_error() => RestClientError::ServerError {
            status,
            method,
            url,
        },
        _ => RestClientError::UnexpectedStatus {
            status,
            method,
            url,
        },
    }
}
