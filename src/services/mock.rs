//! Test doubles for the fetcher and notifier seams.

use std::collections::{HashMap, VecDeque};
use std::result::Result as StdResult;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::FetchFailure;
use crate::models::{DeliveryOutcome, Notification};
use crate::services::{Fetcher, Notifier};

type Scripted = StdResult<String, FetchFailure>;

/// Fetcher that replays a scripted sequence of responses per URL.
///
/// The last scripted response repeats once the queue is drained.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, url: &str, responses: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into());
    }

    /// Script plain HTML bodies.
    pub fn pages(&self, url: &str, bodies: &[&str]) {
        self.script(url, bodies.iter().map(|b| Ok(b.to_string())).collect());
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .count()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ua)| ua.clone())
            .collect()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> StdResult<String, FetchFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), user_agent.to_string()));

        let mut scripts = self.scripts.lock().unwrap();
        let queue = match scripts.get_mut(url) {
            Some(queue) => queue,
            None => return Err(FetchFailure::Transport(format!("no script for {url}"))),
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(FetchFailure::Transport("empty script".into())))
        }
    }
}

/// Notifier that answers with scripted status codes and records messages.
#[derive(Default)]
pub struct RecordingNotifier {
    statuses: Mutex<VecDeque<u16>>,
    sent: Mutex<Vec<(String, Notification)>>,
}

impl RecordingNotifier {
    /// Notifier that always answers 200.
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Notifier answering the given statuses in order, then 200.
    pub fn with_statuses(statuses: &[u16]) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(e, _)| e.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, endpoint: &str, notification: &Notification) -> DeliveryOutcome {
        self.sent
            .lock()
            .unwrap()
            .push((endpoint.to_string(), notification.clone()));
        let status = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
        DeliveryOutcome::from_status(status)
    }
}

/// Minimal HTTP server answering every connection with a fixed response.
///
/// Returns the base URL and the raw requests received so far.
pub async fn serve(status: u16, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let raw = read_request(&mut socket).await;
            seen.lock().unwrap().push(raw);

            let response = format!(
                "HTTP/1.1 {status} Status\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}/"), requests)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
