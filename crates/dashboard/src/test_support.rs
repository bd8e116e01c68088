//! Routing mock HTTP server for end-to-end dashboard tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use savevault_api::{Client, Session};

/// Answers `"METHOD /path"` with a fixed (status, body); anything else
/// gets 404. Records every request line it sees.
pub(crate) struct RouteServer {
    pub url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for RouteServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl RouteServer {
    /// Request lines received so far, e.g. `GET /api/games`.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn client(&self, token: Option<&str>) -> Client {
        Client::new(&self.url, Session::new(token.map(str::to_string))).unwrap()
    }
}

pub(crate) async fn route_server(routes: Vec<(&str, u16, &str)>) -> RouteServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    let routes: Arc<HashMap<String, (u16, Vec<u8>)>> = Arc::new(
        routes
            .into_iter()
            .map(|(route, status, body)| (route.to_string(), (status, body.as_bytes().to_vec())))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));

    let handle = {
        let hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();
                let hits = hits.clone();
                tokio::spawn(async move { serve(stream, &routes, &hits).await });
            }
        })
    };

    RouteServer { url, hits, handle }
}

async fn serve(
    mut stream: TcpStream,
    routes: &HashMap<String, (u16, Vec<u8>)>,
    hits: &Mutex<Vec<String>>,
) {
    let Some(route) = read_route(&mut stream).await else {
        return;
    };
    hits.lock().unwrap().push(route.clone());

    let not_found = (404, br#"{"error":"not found"}"#.to_vec());
    let (status, body) = routes.get(&route).unwrap_or(&not_found);
    let head = format!(
        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(body).await;
    let _ = stream.shutdown().await;
}

/// Reads a whole request and returns its `METHOD /path`.
async fn read_route(stream: &mut TcpStream) -> Option<String> {
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
    let body_len = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + body_len {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut parts = head.lines().next()?.split_whitespace();
    Some(format!("{} {}", parts.next()?, parts.next()?))
}
