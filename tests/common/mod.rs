//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use forward_proxy::{Listener, ProxyConfig, ProxyServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// What a mock origin saw on one connection.
#[derive(Debug)]
pub struct OriginExchange {
    /// Request head exactly as received, through the blank line.
    pub request: Vec<u8>,
    /// Whether the proxy closed its side after the response was sent.
    pub closed_by_proxy: bool,
}

/// A running mock origin.
pub struct MockOrigin {
    pub addr: SocketAddr,
    pub exchanges: mpsc::UnboundedReceiver<OriginExchange>,
    accepted: Arc<AtomicUsize>,
}

impl MockOrigin {
    /// Connections accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Wait for the next completed exchange.
    pub async fn next_exchange(&mut self) -> OriginExchange {
        tokio::time::timeout(Duration::from_secs(5), self.exchanges.recv())
            .await
            .expect("origin exchange timed out")
            .expect("origin stopped")
    }
}

/// Build a minimal HTTP/1.1 response around `body`.
pub fn http_response(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}

/// Start a mock origin that replies to every request with `response`.
pub async fn start_origin(response: Vec<u8>) -> MockOrigin {
    start_origin_with_delay(response, Duration::ZERO).await
}

/// Start a mock origin that waits `delay` after reading the request head.
pub async fn start_origin_with_delay(response: Vec<u8>, delay: Duration) -> MockOrigin {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, exchanges) = mpsc::unbounded_channel();
    let accepted = Arc::new(AtomicUsize::new(0));
    let response = Arc::new(response);

    let counter = accepted.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let tx = tx.clone();
                    let response = response.clone();
                    tokio::spawn(async move {
                        let request = read_head(&mut socket).await;
                        tokio::time::sleep(delay).await;
                        let _ = socket.write_all(&response).await;
                        let _ = socket.shutdown().await;

                        let mut peek = [0u8; 1];
                        let closed_by_proxy =
                            !matches!(socket.read(&mut peek).await, Ok(n) if n > 0);
                        let _ = tx.send(OriginExchange {
                            request,
                            closed_by_proxy,
                        });
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockOrigin {
        addr,
        exchanges,
        accepted,
    }
}

async fn read_head(socket: &mut TcpStream) -> Vec<u8> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }
    head
}

/// Start the proxy on an ephemeral local port.
///
/// The accept loop stops when the returned `Shutdown` is triggered or dropped.
pub async fn start_proxy(mut config: ProxyConfig) -> (SocketAddr, Shutdown) {
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;

    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = ProxyServer::new(&config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Send `request` to the proxy and read until it closes the connection.
pub async fn send_raw(proxy: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut client = TcpStream::connect(proxy).await.unwrap();
    client.write_all(request).await.unwrap();

    let mut response = Vec::new();
    let read = tokio::time::timeout(Duration::from_secs(5), client.read_to_end(&mut response))
        .await
        .expect("proxy did not close the client connection");
    if let Err(e) = read {
        assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset, "{e}");
    }
    response
}

/// Send an absolute-form GET through the proxy.
pub async fn proxy_get(proxy: SocketAddr, uri: &str) -> Vec<u8> {
    let request = format!("GET {uri} HTTP/1.1\r\nHost: ignored\r\nAccept: */*\r\n\r\n");
    send_raw(proxy, request.as_bytes()).await
}
