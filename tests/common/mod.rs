//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use dev_server::config::ServerConfig;
use dev_server::http::HttpServer;
use dev_server::lifecycle::Shutdown;

/// Request heads seen by a mock upstream, as `(request line, Host header)`.
pub type Seen = Arc<Mutex<Vec<(String, String)>>>;

/// Start a mock upstream that answers every request with `body` and records
/// the request line and Host header.
#[allow(dead_code)]
pub async fn start_recording_backend(addr: SocketAddr, body: &'static [u8]) -> Seen {
    let listener = TcpListener::bind(addr).await.unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        log.lock().unwrap().push(parse_head(&head));

                        let mut response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        )
                        .into_bytes();
                        response.extend_from_slice(body);
                        let _ = socket.write_all(&response).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    seen
}

/// Start a mock upstream that accepts a connection and drops it without answering.
#[allow(dead_code)]
pub async fn start_dropping_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let _ = read_head(&mut socket).await;
            drop(socket);
        }
    });
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn parse_head(head: &str) -> (String, String) {
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default().to_string();
    let host = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("host"))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();
    (request_line, host)
}

/// Config whose folders, files and index all live under `dir`.
pub fn site_config(dir: &Path, addr: SocketAddr) -> ServerConfig {
    let mut config = ServerConfig {
        index: dir.join("index.html"),
        favicon: dir.join("favicon.ico"),
        port: Some(addr.port()),
        host: Some(addr.ip().to_string()),
        ..ServerConfig::default()
    };
    for folder in ["app", "assets", "dist", "config"] {
        config.folders.insert(folder.to_string(), dir.join(folder));
    }
    config
        .files
        .insert("app/config.js".to_string(), dir.join("app/config.js"));
    config.stylesheets.dir = dir.join("assets/css");
    config
}

/// Spawn the server on `addr` and wait until it accepts connections.
pub async fn start_server(config: ServerConfig) -> Shutdown {
    let addr = config.bind_address();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let listener = TcpListener::bind(&addr).await.unwrap();
    let stop = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
