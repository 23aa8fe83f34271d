//! Minimal HTTP/1.1 fixture server for integration tests
//!
//! Serves one canned response per connection and counts requests, so tests
//! can assert how many fetches a run actually issued. Responses close the
//! connection after the body, which lets a test declare a content length
//! larger than the bytes it sends to simulate a truncated transfer.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response for one request
pub struct Canned {
    pub status: u16,
    pub body: Vec<u8>,
    /// Overrides the Content-Length header; more than `body.len()` makes
    /// the transfer appear truncated to the client
    pub declared_length: Option<u64>,
}

impl Canned {
    pub fn json(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            declared_length: None,
        }
    }
}

#[allow(dead_code)]
pub struct TestServer {
    addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl TestServer {
    /// Bind to an ephemeral local port and serve `respond(target)` per request
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Canned + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let respond = Arc::new(respond);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let counter = Arc::clone(&counter);
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut filled = 0;
                    loop {
                        match socket.read(&mut buf[filled..]).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => filled += n,
                        }
                        if buf[..filled].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                        if filled == buf.len() {
                            return;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..filled]);
                    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    counter.fetch_add(1, Ordering::SeqCst);

                    let canned = (*respond)(&target);
                    let declared = canned
                        .declared_length
                        .unwrap_or(canned.body.len() as u64);
                    let head = format!(
                        "HTTP/1.1 {} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        canned.status, declared
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&canned.body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, hits }
    }

    /// Base URL of the fixture server, with a trailing slash
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
