//! Raw TCP mock HTTP server for client tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A request as received by the mock server.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub head: String,
    pub body: String,
}

impl Captured {
    /// Request line, e.g. `GET /api/games HTTP/1.1`.
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }
}

pub(crate) struct MockServer {
    pub url: String,
    pub requests: mpsc::UnboundedReceiver<Captured>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts a server answering successive connections with `responses`
/// (status, body) in order.
pub(crate) async fn mock_server(responses: Vec<(u16, &str)>) -> MockServer {
    let raw = responses
        .into_iter()
        .map(|(status, body)| response(status, body.len(), body))
        .collect();
    raw_server(raw).await
}

/// Answers once with a 200 whose `Content-Length` promises more bytes than
/// are sent before the connection closes.
pub(crate) async fn truncated_server(body: &str) -> MockServer {
    raw_server(vec![response(200, body.len() + 64, body)]).await
}

fn response(status: u16, content_length: usize, body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n{body}"
    )
    .into_bytes()
}

async fn raw_server(responses: Vec<Vec<u8>>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{port}");
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        for raw in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            if let Some(captured) = read_request(&mut stream).await {
                let _ = tx.send(captured);
            }
            let _ = stream.write_all(&raw).await;
            let _ = stream.shutdown().await;
        }
    });

    MockServer {
        url,
        requests: rx,
        handle,
    }
}

/// Reads one request: headers, then `Content-Length` bytes of body.
async fn read_request(stream: &mut TcpStream) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| v.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(Captured { head, body })
}

/// Returns a base URL nothing listens on.
pub(crate) async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
