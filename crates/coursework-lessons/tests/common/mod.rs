#![allow(dead_code)]

use async_trait::async_trait;
use coursework_ai::{AiBackend, AiError, AudioFile, ChatReply, ChatRequest, FunctionCall};
use coursework_core::{Exchange, ProtocolError, Settings, TaskClient, Transport};
use coursework_lessons::LessonContext;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Grading service replaying canned responses and recording every exchange
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Value>>,
    calls: Mutex<Vec<Exchange>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.responses.lock().unwrap().push_back(value);
        self
    }

    /// Token grant followed by the task payload
    pub fn task(self, token: &str, payload: Value) -> Self {
        let mut task = json!({"code": 0, "msg": "OK"});
        if let (Some(task), Some(fields)) = (task.as_object_mut(), payload.as_object()) {
            task.extend(fields.clone());
        }
        self.reply(json!({"code": 0, "msg": "token", "token": token}))
            .reply(task)
    }

    pub fn accepted(self) -> Self {
        self.reply(json!({"code": 0, "msg": "OK", "note": "CORRECT"}))
    }

    pub fn calls(&self) -> Vec<Exchange> {
        self.calls.lock().unwrap().clone()
    }

    /// The last exchange, which submits the answer
    pub fn submitted(&self) -> Exchange {
        self.calls().last().cloned().expect("no exchange recorded")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, exchange: Exchange) -> Result<Value, ProtocolError> {
        self.calls.lock().unwrap().push(exchange);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected exchange"))
    }
}

pub fn client(transport: &Arc<ScriptedTransport>) -> TaskClient {
    TaskClient::new(transport.clone(), "test-key")
}

/// AI backend answering chats from a queue
#[derive(Default)]
pub struct SpyBackend {
    pub flagged_words: Vec<&'static str>,
    replies: Mutex<VecDeque<ChatReply>>,
    pub moderated: Mutex<Vec<String>>,
    pub completions: Mutex<Vec<ChatRequest>>,
    pub embedded: Mutex<Vec<String>>,
    embedding: Vec<f32>,
}

impl SpyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flagging(words: Vec<&'static str>) -> Self {
        Self {
            flagged_words: words,
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

    pub fn call(self, name: &str, arguments: Value) -> Self {
        self.replies.lock().unwrap().push_back(ChatReply {
            content: String::new(),
            function_call: Some(FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            }),
        });
        self
    }

    /// Vector returned for every embedding request
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn embedded(&self) -> Vec<String> {
        self.embedded.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<ChatRequest> {
        self.completions.lock().unwrap().clone()
    }

    pub fn moderated(&self) -> Vec<String> {
        self.moderated.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiBackend for SpyBackend {
    async fn moderate(&self, input: &str) -> Result<bool, AiError> {
        self.moderated.lock().unwrap().push(input.to_string());
        Ok(self.flagged_words.iter().any(|word| input.contains(word)))
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, AiError> {
        self.completions.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(AiError::EmptyResponse("chat completion"))
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AiError> {
        self.embedded.lock().unwrap().push(input.to_string());
        if self.embedding.is_empty() {
            return Ok(vec![0.25, 0.5, 0.75]);
        }
        Ok(self.embedding.clone())
    }

    async fn transcribe(&self, audio: AudioFile) -> Result<String, AiError> {
        Ok(format!("transcript of {}", audio.file_name))
    }
}

pub fn context(spy: &Arc<SpyBackend>) -> LessonContext {
    LessonContext::new(Settings::new()).with_backend(spy.clone())
}

pub fn context_with(settings: Settings, spy: &Arc<SpyBackend>) -> LessonContext {
    LessonContext::new(settings).with_backend(spy.clone())
}

/// Serve one response with the given content type and return its URL
pub async fn serve_once(path: &str, content_type: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}{path}")
}

/// A request as seen by [`serve_json`]
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Captured {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve the given JSON responses in order, one connection each
pub async fn serve_json(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            sink.lock().unwrap().push(request);
            let response = format!(
                "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
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

        let text = String::from_utf8_lossy(&received).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let head = &text[..header_end];
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
                    body: text[header_end + 4..].to_string(),
                };
            }
        }
        if n == 0 {
            return Captured {
                method: String::new(),
                path: String::new(),
                body: text,
            };
        }
    }
}
