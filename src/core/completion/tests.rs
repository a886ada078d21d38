use super::*;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::utils::test_utils::{read_http_request, CapturedRequest};

/// Serve a single canned HTTP response and record the request that hit it.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, Arc<Mutex<Option<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured = Arc::new(Mutex::new(None));
    let captured_for_server = Arc::clone(&captured);

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        let request = read_http_request(&mut stream).await?;
        *captured_for_server.lock().await = Some(request);

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        stream.shutdown().await.map_err(|err| err.to_string())?;
        Ok::<(), String>(())
    });

    (format!("http://{addr}/v1/chat/completions"), captured)
}

fn sample_context() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful banking assistant."),
        ChatMessage::new("user", "loan rates?"),
    ]
}

#[tokio::test]
async fn successful_response_returns_first_choice_content() {
    let (endpoint, captured) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"content":" Hello there "}}]}"#,
    )
    .await;
    let backend = HttpBackend::new(endpoint, "test-key", "test-model");

    let reply = backend
        .complete(&sample_context())
        .await
        .expect("completion should succeed");
    assert_eq!(reply, " Hello there ");

    let captured = captured.lock().await;
    let request = captured.as_ref().expect("server should capture a request");
    assert_eq!(request.request_line, "POST /v1/chat/completions HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("Bearer test-key"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let body: serde_json::Value =
        serde_json::from_slice(&request.body).expect("request body should be JSON");
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["temperature"], 0.5);
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["messages"][1]["content"], "loan rates?");
}

#[tokio::test]
async fn rate_limit_status_is_structured() {
    let (endpoint, _captured) = serve_once(
        "429 Too Many Requests",
        r#"{"error":{"message":"Rate limit reached"}}"#,
    )
    .await;
    let backend = HttpBackend::new(endpoint, "test-key", "test-model");

    let err = backend
        .complete(&sample_context())
        .await
        .expect_err("429 should fail");
    assert_eq!(err.status_code(), Some(429));
    assert_eq!(
        err.to_string(),
        "API request failed with status 429: Rate limit reached"
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (endpoint, _captured) = serve_once("200 OK", "not json").await;
    let backend = HttpBackend::new(endpoint, "test-key", "test-model");

    let err = backend
        .complete(&sample_context())
        .await
        .expect_err("garbage body should fail");
    assert!(matches!(err, CompletionError::Decode(_)));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn missing_choices_is_an_empty_response() {
    let (endpoint, _captured) = serve_once("200 OK", r#"{"choices":[]}"#).await;
    let backend = HttpBackend::new(endpoint, "test-key", "test-model");

    let err = backend
        .complete(&sample_context())
        .await
        .expect_err("empty choices should fail");
    assert!(matches!(err, CompletionError::EmptyResponse));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept should succeed");
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let backend = HttpBackend::new(
        format!("http://{addr}/v1/chat/completions"),
        "test-key",
        "test-model",
    )
    .with_timeout(Duration::from_millis(200));

    let err = backend
        .complete(&sample_context())
        .await
        .expect_err("silent server should time out");
    assert!(matches!(err, CompletionError::Timeout(_)));
    assert_eq!(err.to_string(), "request timed out after 0.2s");

    server.abort();
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);

    let backend = HttpBackend::new(
        format!("http://{addr}/v1/chat/completions"),
        "test-key",
        "test-model",
    );

    let err = backend
        .complete(&sample_context())
        .await
        .expect_err("closed port should fail");
    assert!(matches!(err, CompletionError::Transport(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn from_settings_targets_chat_completions() {
    let settings = Settings {
        api_key: "k".to_string(),
        base_url: "https://api.example.com/v1/".to_string(),
        model: "bank-model".to_string(),
        timeout: Duration::from_secs(7),
        context_warn_threshold: 10,
        log_file: None,
    };

    let backend = HttpBackend::from_settings(&settings);
    assert_eq!(backend.endpoint(), "https://api.example.com/v1/chat/completions");
    assert_eq!(backend.model(), "bank-model");
    assert_eq!(backend.timeout, Duration::from_secs(7));
}
