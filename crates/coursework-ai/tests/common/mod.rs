#![allow(dead_code)]

use async_trait::async_trait;
use coursework_ai::{AiBackend, AiError, AudioFile, ChatReply, ChatRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Backend answering from queues and recording what it was asked
#[derive(Default)]
pub struct SpyBackend {
    pub flagged: bool,
    pub moderation_fails: bool,
    pub moderated: Mutex<Vec<String>>,
    pub completions: Mutex<Vec<ChatRequest>>,
    pub replies: Mutex<VecDeque<ChatReply>>,
    pub embed_calls: Mutex<u32>,
    pub embed_failures: u32,
    pub transcribed: Mutex<Vec<AudioFile>>,
}

impl SpyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flagging() -> Self {
        Self {
            flagged: true,
            ..Self::default()
        }
    }

    pub fn reply(self, content: &str) -> Self {
        self.replies.lock().unwrap().push_back(ChatReply {
            content: content.to_string(),
            function_call: None,
        });
        self
    }

    pub fn reply_with(self, reply: ChatReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn completions(&self) -> Vec<ChatRequest> {
        self.completions.lock().unwrap().clone()
    }

    pub fn moderated(&self) -> Vec<String> {
        self.moderated.lock().unwrap().clone()
    }

    pub fn embed_calls(&self) -> u32 {
        *self.embed_calls.lock().unwrap()
    }
}

#[async_trait]
impl AiBackend for SpyBackend {
    async fn moderate(&self, input: &str) -> Result<bool, AiError> {
        self.moderated.lock().unwrap().push(input.to_string());
        if self.moderation_fails {
            return Err(AiError::EmptyResponse("moderation"));
        }
        Ok(self.flagged)
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, AiError> {
        self.completions.lock().unwrap().push(request);
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AiError> {
        let mut calls = self.embed_calls.lock().unwrap();
        *calls += 1;
        if *calls <= self.embed_failures {
            return Err(AiError::Api {
                status: 503,
                body: format!("overloaded, call {}", *calls),
            });
        }
        Ok(vec![input.len() as f32, 0.5])
    }

    async fn transcribe(&self, audio: AudioFile) -> Result<String, AiError> {
        let name = audio.file_name.clone();
        self.transcribed.lock().unwrap().push(audio);
        Ok(format!("transcript of {name}"))
    }
}

/// A request as seen by [`serve`]
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub headers: String,
    pub body: String,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve the given responses in order, one connection each
pub async fn serve(
    responses: Vec<(u16, &'static str, String)>,
) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);

    tokio::spawn(async move {
        for (status, content_type, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            sink.lock().unwrap().push(request);
            let response = format!(
                "HTTP/1.1 {status} Status\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    (format!("http://{addr}"), captured)
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut received = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        received.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = find(&received, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&received[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= header_end + 4 + content_length || n == 0 {
                let mut request_line = head.lines().next().unwrap_or_default().split(' ');
                return Captured {
                    method: request_line.next().unwrap_or_default().to_string(),
                    path: request_line.next().unwrap_or_default().to_string(),
                    headers: head.to_lowercase(),
                    body: String::from_utf8_lossy(&received[header_end + 4..]).to_string(),
                };
            }
        }
        if n == 0 {
            panic!("connection closed before the request was complete");
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
