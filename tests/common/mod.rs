//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the mock collector.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub status: u16,
}

/// Handle to a running mock collector.
#[derive(Clone)]
pub struct MockCollector {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[allow(dead_code)]
impl MockCollector {
    pub fn url(&self) -> String {
        format!("http://{}/api/v1/spans", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn accepted(&self) -> Vec<CapturedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.status == 202)
            .collect()
    }

    /// Poll until `count` requests were accepted or `timeout` passes.
    pub async fn wait_for_accepted(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.accepted().len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

/// Start a collector that answers every request with 202.
#[allow(dead_code)]
pub async fn start_mock_collector() -> MockCollector {
    start_programmable_collector(|_| async { (202, String::new()) }).await
}

/// Start a programmable collector on an ephemeral port.
///
/// `f` receives the zero-based request index and returns status and body.
pub async fn start_programmable_collector<F, Fut>(f: F) -> MockCollector
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let captured = requests.clone();
    tokio::spawn(async move {
        let mut index = 0;
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let response = f(index);
            index += 1;
            let captured = captured.clone();
            tokio::spawn(async move {
                let _ = handle(socket, response, captured).await;
            });
        }
    });

    MockCollector { addr, requests }
}

async fn handle<Fut>(
    mut socket: TcpStream,
    response: Fut,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
) -> std::io::Result<()>
where
    Fut: Future<Output = (u16, String)>,
{
    let mut request = read_request(&mut socket).await?;
    let (status, body) = response.await;
    request.status = status;
    captured.lock().unwrap().push(request);

    let status_text = match status {
        200 => "200 OK",
        202 => "202 Accepted",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        other => return Err(std::io::Error::other(format!("unsupported status {other}"))),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<CapturedRequest> {
    let mut buf = Vec::new();
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let mut chunk = [0u8; 1024];
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0u8; content_length - body.len()];
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Ok(CapturedRequest {
        method,
        path,
        content_type,
        body,
        status: 0,
    })
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
