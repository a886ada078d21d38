use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::api::ChatMessage;
use crate::core::completion::{CompletionBackend, CompletionError};

/// Backend that replays queued outcomes and records every context it was sent.
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    pub fn new(outcomes: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected completion call #{}", self.calls()))
    }
}

/// One HTTP/1.1 request as seen by a stub server.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

async fn read_more(stream: &mut TcpStream, buffer: &mut Vec<u8>) -> Result<(), String> {
    let mut chunk = [0_u8; 1024];
    let read = stream.read(&mut chunk).await.map_err(|err| err.to_string())?;
    if read == 0 {
        return Err("connection closed mid-request".to_string());
    }
    buffer.extend_from_slice(&chunk[..read]);
    Ok(())
}

/// Read one request (head plus `Content-Length` body) off a stub connection.
pub async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let head_len = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        read_more(stream, &mut buffer).await?;
    };

    let head = std::str::from_utf8(&buffer[..head_len]).map_err(|err| err.to_string())?;
    let mut lines = head.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines.next().ok_or("empty request head")?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.parse::<usize>().map_err(|err| err.to_string()))
        .transpose()?
        .unwrap_or(0);

    while buffer.len() < head_len + content_length {
        read_more(stream, &mut buffer).await?;
    }
    let body = buffer[head_len..head_len + content_length].to_vec();

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
