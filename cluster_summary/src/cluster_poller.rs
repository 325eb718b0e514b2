use std::future::Future;

use tracing::instrument;

use crate::{
    cluster_target::ClusterTarget,
    error_chain_fmt,
    pools::{PoolsDefaultInfo, PoolsInfo},
    RestClient, RestClientError, RestClientPool,
};

/// Both payloads needed to describe a cluster, as answered by a single node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSnapshot {
    pub pools: PoolsInfo,
    pub pools_default: PoolsDefaultInfo,
}

/// Why no node of a cluster produced a [`ClusterSnapshot`].
#[derive(thiserror::Error)]
pub enum PollError {
    #[error("Unknown Error")]
    NoNodes,
    /// Every node failed; holds the failure of the last node tried.
    #[error(transparent)]
    Exhausted(#[from] RestClientError),
}
impl std::fmt::Debug for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub type PollOutcome = Result<ClusterSnapshot, PollError>;

/// Tries `nodes` in order and returns the first snapshot `fetch` produces.
///
/// Nodes after the first success are never passed to `fetch`.
pub async fn poll_nodes<'a, I, F, Fut>(nodes: I, mut fetch: F) -> PollOutcome
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<ClusterSnapshot, RestClientError>>,
{
    let mut last_error = None;
    for node in nodes {
        match fetch(node).await {
            Ok(snapshot) => {
                tracing::info!("Node {} answered for cluster {}", node, snapshot.pools.uuid);
                return Ok(snapshot);
            }
            Err(e) => {
                tracing::warn!("Error getting cluster information from node {}: {}", node, e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.map_or(PollError::NoNodes, PollError::Exhausted))
}

/// Polls clusters through a shared [`RestClientPool`].
#[derive(Debug, Clone)]
pub struct ClusterPoller {
    pool: RestClientPool,
}

impl ClusterPoller {
    pub fn new(pool: RestClientPool) -> Self {
        Self { pool }
    }

    /// Polls the nodes of `target` in listed order until one answers both calls.
    #[instrument(
        level = "info",
        name = "Poll Cluster",
        skip(self, target),
        fields(login = %target.login)
    )]
    pub async fn poll(&self, target: &ClusterTarget) -> PollOutcome {
        poll_nodes(target.nodes.iter().map(String::as_str), move |node| async move {
            let client = self.pool.client_for(node, target)?;
            fetch_snapshot(&client).await
        })
        .await
    }
}

/// Gets `/pools` then `/pools/default` from one node. The second call is skipped if the first
/// fails.
async fn fetch_snapshot(client: &RestClient) -> Result<ClusterSnapshot, RestClientError> {
    let pools = client.get_pools().await?;
    let pools_default = client.get_pools_default().await?;
    Ok(ClusterSnapshot {
        pools,
        pools_default,
    })
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};

    use super::*;

    fn snapshot(uuid: &str) -> ClusterSnapshot {
        ClusterSnapshot {
            pools: PoolsInfo {
                uuid: uuid.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn unauthorized(node: &str) -> RestClientError {
        RestClientError::Unauthorized {
            method: Method::GET,
            url: format!("{}/pools", node),
        }
    }

    #[tokio::test]
    async fn poll_nodes_stops_at_first_success() {
        // Arrange
        let nodes = ["http://a:8091", "http://b:8091", "http://c:8091"];
        let mut contacted = Vec::new();

        // Act
        let result = poll_nodes(nodes, |node| {
            contacted.push(node.to_string());
            let answer = if node == "http://a:8091" {
                Err(unauthorized(node))
            } else {
                Ok(snapshot(node))
            };
            async move { answer }
        })
        .await;

        // Assert
        assert_eq!(result.unwrap().pools.uuid, "http://b:8091");
        assert_eq!(contacted, vec!["http://a:8091", "http://b:8091"]);
    }

    #[tokio::test]
    async fn poll_nodes_returns_last_error_when_all_fail() {
        let nodes = ["http://a:8091", "http://b:8091"];

        let result = poll_nodes(nodes, |node| {
            let answer = if node == "http://a:8091" {
                Err(unauthorized(node))
            } else {
                Err(RestClientError::ServerError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    method: Method::GET,
                    url: format!("{}/pools/default", node),
                })
            };
            async move { answer }
        })
        .await;

        match result {
            Err(PollError::Exhausted(RestClientError::ServerError { url, .. })) => {
                assert_eq!(url, "http://b:8091/pools/default")
            }
            other => panic!("Expected the last node's error, got {:?}", other),
        }
    }

    #[test]
    fn poll_nodes_without_nodes_is_unknown_error() {
        let result = tokio_test::block_on(poll_nodes(Vec::<&str>::new(), |_| async {
            Ok(ClusterSnapshot::default())
        }));

        let error = result.unwrap_err();
        assert!(matches!(error, PollError::NoNodes));
        assert_eq!(error.to_string(), "Unknown Error");
    }

    #[tokio::test]
    async fn poller_treats_invalid_address_as_node_failure() {
        let pool = crate::RestClientBuilder::new().build().unwrap();
        let poller = ClusterPoller::new(pool);
        let target = ClusterTarget::new("admin", "password", &["not-a-url"]);

        let result = poller.poll(&target).await;

        assert!(matches!(
            result,
            Err(PollError::Exhausted(RestClientError::InvalidUrl(_)))
        ));
    }
}
