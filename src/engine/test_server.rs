//! Loopback HTTP server for loading tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone)]
pub(crate) struct Route {
    pub status: u16,
    pub body: &'static str,
    pub delay: Duration,
}

pub(crate) fn route(status: u16, body: &'static str) -> Route {
    Route {
        status,
        body,
        delay: Duration::ZERO,
    }
}

pub(crate) fn slow_route(status: u16, body: &'static str, delay_ms: u64) -> Route {
    Route {
        status,
        body,
        delay: Duration::from_millis(delay_ms),
    }
}

/// Serves `routes` by path until the test runtime shuts down. Unknown paths
/// answer 404 with an empty body.
pub(crate) async fn serve(routes: Vec<(&'static str, Route)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: HashMap<&'static str, Route> = routes.into_iter().collect();

    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = sock.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let route = routes.get(path.as_str()).cloned().unwrap_or_else(|| route(404, ""));
                tokio::time::sleep(route.delay).await;

                let reply = format!(
                    "HTTP/1.1 {} X\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    route.status,
                    route.body.len(),
                    route.body
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    addr
}

pub(crate) fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
