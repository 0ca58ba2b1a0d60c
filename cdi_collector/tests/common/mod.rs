#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cdi_collector::providers::bcb_sgs::SgsParams;
use cdi_collector::providers::errors::{EmptyPayloadSnafu, StatusSnafu};
use cdi_collector::providers::{ProviderError, RateProvider};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Params pointing the SGS provider at a local address.
pub fn local_params(addr: SocketAddr, timeout: Duration) -> SgsParams {
    SgsParams {
        base_url: format!("http://{addr}"),
        timeout,
        ..Default::default()
    }
}

/// Accepts one connection and answers it with `status` and a JSON `body`.
pub async fn serve_once(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let response = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    addr
}

/// A listener that accepts at the TCP level but never answers.
///
/// Keep the returned listener alive for the duration of the test.
pub async fn silent_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    (listener, addr)
}

/// What a [`ScriptedProvider`] does on one call.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Rate(f64),
    Unreachable,
    Empty,
}

/// Replays `steps` in order, then repeats the last one.
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    last: Step,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        let steps: VecDeque<Step> = steps.into_iter().collect();
        let last = steps.back().copied().unwrap_or(Step::Empty);
        Self {
            steps: Mutex::new(steps),
            last,
        }
    }
}

#[async_trait]
impl RateProvider for ScriptedProvider {
    async fn fetch_latest(&self) -> Result<f64, ProviderError> {
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(self.last);
        match step {
            Step::Rate(rate) => Ok(rate),
            Step::Unreachable => StatusSnafu {
                status: 503u16,
                message: "service unavailable",
            }
            .fail(),
            Step::Empty => EmptyPayloadSnafu.fail(),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Non-empty lines of the file at `path`.
pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read store")
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
