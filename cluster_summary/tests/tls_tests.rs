//! Certificate handling of the rest client against a node with a self-signed certificate.

use std::sync::Arc;

use cluster_summary::{cluster_target::ClusterTarget, RestClientBuilder, RestClientError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::rustls::{Certificate, PrivateKey, ServerConfig};
use tokio_rustls::TlsAcceptor;

const POOLS_BODY: &str = r#"{"uuid": "u", "implementationVersion": "7.1.3-3479-enterprise"}"#;

/// Starts an https node whose certificate no trusted authority signed and returns its address.
async fn self_signed_node() -> String {
    let cert =
        rcgen::generate_simple_self_signed(vec!["127.0.0.1".to_string(), "localhost".to_string()])
            .unwrap();
    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(
            vec![Certificate(cert.serialize_der().unwrap())],
            PrivateKey(cert.serialize_private_key_der()),
        )
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // A client that rejects the certificate fails the handshake here
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    respond(&mut tls, POOLS_BODY).await;
                }
            });
        }
    });

    format!("https://{}", address)
}

/// Reads one request head and answers it with `body` as JSON.
async fn respond<S>(stream: &mut S, body: &str)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

#[tokio::test]
async fn self_signed_certificate_is_an_unknown_authority() {
    // Arrange
    let node = self_signed_node().await;
    let target = ClusterTarget::new("Administrator", "password", &[node.clone()]);
    let client = RestClientBuilder::new()
        .build()
        .unwrap()
        .client_for(&node, &target)
        .unwrap();

    // Act
    let error = client.get_pools().await.unwrap_err();

    // Assert
    assert!(
        matches!(error, RestClientError::UnknownAuthority { .. }),
        "{:?}",
        error
    );
    let message = error.to_string();
    assert!(message.contains("--no-ssl-verify"));
    assert!(message.contains("--cacert"));
    assert!(message.contains("man-in-the-middle"));
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn accepting_invalid_certificates_reaches_self_signed_node() {
    // Arrange
    let node = self_signed_node().await;
    let target = ClusterTarget::new("Administrator", "password", &[node.clone()]);
    let client = RestClientBuilder::new()
        .set_accept_invalid_certs(true)
        .build()
        .unwrap()
        .client_for(&node, &target)
        .unwrap();

    // Act
    let pools = client.get_pools().await.unwrap();

    // Assert
    assert_eq!(pools.uuid, "u");
    assert_eq!(pools.implementation_version, "7.1.3-3479-enterprise");
}
