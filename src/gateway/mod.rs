//! Minimal HTTP gateway (chat API + health check + HTML test pages).
//! Raw TCP + tokio; one spawned task per connection.

use crate::config::Config;
use crate::conversation::{ConversationManager, DEFAULT_USER_ID};
use crate::health;
use crate::providers;
use crate::util::truncate_with_ellipsis;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

mod pages;

pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    let actual_port = listener.local_addr()?.port();
    let addr = format!("{host}:{actual_port}");

    let provider: Arc<dyn providers::Provider> = Arc::from(providers::create_provider(
        "gemini",
        config.api_key.as_deref(),
        &config.generation,
    )?);
    let manager = Arc::new(ConversationManager::new(
        provider,
        config.default_model.clone(),
        config.default_temperature,
    ));
    let gemini_configured = config.gemini_configured();

    println!("🏙️  CivicBot gateway listening on http://{addr}");
    println!("  GET  /health      — health check");
    println!("  POST /api/chat    — {{\"message\": \"...\", \"user_id\": \"optional\"}}");
    println!("  POST /api/clear   — {{\"user_id\": \"optional\"}}");
    println!("  GET  /test        — browser test page");
    if !gemini_configured {
        println!("  ⚠️  No Gemini API key configured — every reply will use the scripted fallback.");
    }
    println!("  Press Ctrl+C to stop.\n");

    health::mark_component_ok("gateway");

    loop {
        let (mut stream, peer) = listener.accept().await?;
        let manager = manager.clone();

        tokio::spawn(async move {
            // Read with 30s timeout to prevent slow-loris connections
            let mut buf = vec![0u8; 65_536]; // 64KB max request
            let n = match tokio::time::timeout(Duration::from_secs(30), stream.read(&mut buf)).await
            {
                Ok(Ok(n)) if n > 0 => n,
                _ => return,
            };

            let request = String::from_utf8_lossy(&buf[..n]);
            let first_line = request.lines().next().unwrap_or("");
            let parts: Vec<&str> = first_line.split_whitespace().collect();

            if let [method, path, ..] = parts.as_slice() {
                tracing::info!("{peer} → {method} {path}");
                let path = path.split('?').next().unwrap_or(path);
                handle_request(&mut stream, method, path, &request, &manager, gemini_configured)
                    .await;
            } else {
                let _ = send_response(&mut stream, 400, "text/plain", "Bad Request").await;
            }
        });
    }
}

async fn handle_request(
    stream: &mut tokio::net::TcpStream,
    method: &str,
    path: &str,
    request: &str,
    manager: &Arc<ConversationManager>,
    gemini_configured: bool,
) {
    match (method, path) {
        // CORS preflight for any route
        ("OPTIONS", _) => {
            let _ = send_response(stream, 204, "text/plain", "").await;
        }

        ("GET", "/") => {
            let _ = send_response(stream, 200, "text/html", pages::INDEX_HTML).await;
        }

        ("GET", "/test") => {
            let _ = send_response(stream, 200, "text/html", pages::TEST_HTML).await;
        }

        ("GET", "/health") => {
            let body = serde_json::json!({
                "status": "healthy",
                "service": "civicbot",
                "gemini_configured": gemini_configured,
                "sessions": manager.session_count(),
                "runtime": health::snapshot_json(),
            });
            let _ = send_json(stream, 200, &body).await;
        }

        // Testing aid: explain how to call the chat endpoint
        ("GET", "/api/chat") => {
            let body = serde_json::json!({
                "success": false,
                "error": "Please use POST method for chat. Example:",
                "example": {
                    "method": "POST",
                    "url": "/api/chat",
                    "headers": {"Content-Type": "application/json"},
                    "body": {"message": "Your message here", "user_id": "optional_user_id"}
                }
            });
            let _ = send_json(stream, 200, &body).await;
        }

        ("POST", "/api/chat") => {
            handle_chat(stream, request, manager).await;
        }

        ("POST", "/api/clear" | "/api/clear-chat") => {
            handle_clear(stream, request, manager).await;
        }

        _ => {
            let body = serde_json::json!({
                "error": "Not found",
                "routes": ["GET /health", "POST /api/chat", "POST /api/clear", "GET /test"]
            });
            let _ = send_json(stream, 404, &body).await;
        }
    }
}

/// Extract the JSON body from a raw HTTP request.
fn request_body(request: &str) -> &str {
    request
        .split("\r\n\r\n")
        .nth(1)
        .or_else(|| request.split("\n\n").nth(1))
        .unwrap_or("")
}

/// Pull a trimmed, validated message out of a chat request body.
/// Errors are client errors, phrased for the caller.
fn parse_chat_body(body: &str) -> Result<(String, String), &'static str> {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return Err("Invalid JSON. Send JSON with 'message' field.");
    };
    let Some(message) = parsed.get("message") else {
        return Err("Missing 'message' in request");
    };
    let message = match message {
        serde_json::Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if message.is_empty() {
        return Err("Message cannot be empty");
    }
    let user_id = parsed
        .get("user_id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_USER_ID)
        .to_string();
    Ok((user_id, message))
}

fn parse_user_id(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("user_id"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_USER_ID)
        .to_string()
}

async fn handle_chat(
    stream: &mut tokio::net::TcpStream,
    request: &str,
    manager: &Arc<ConversationManager>,
) {
    let (user_id, message) = match parse_chat_body(request_body(request)) {
        Ok(parsed) => parsed,
        Err(error) => {
            let err = serde_json::json!({"success": false, "error": error});
            let _ = send_json(stream, 400, &err).await;
            return;
        }
    };

    tracing::info!(
        "processing message from {user_id}: {}",
        truncate_with_ellipsis(&message, 80)
    );

    let outcome = manager.handle_message(&user_id, &message).await;

    let mut body = serde_json::json!({
        "success": true,
        "response": outcome.response,
        "user_id": outcome.user_id,
        "message_count": outcome.message_count,
    });
    if outcome.used_fallback {
        body["note"] = serde_json::json!("Using fallback response due to API error");
    }
    let _ = send_json(stream, 200, &body).await;
}

async fn handle_clear(
    stream: &mut tokio::net::TcpStream,
    request: &str,
    manager: &Arc<ConversationManager>,
) {
    let user_id = parse_user_id(request_body(request));
    manager.clear_session(&user_id);

    let body = serde_json::json!({
        "success": true,
        "message": format!("Chat history cleared for user {user_id}")
    });
    let _ = send_json(stream, 200, &body).await;
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

// The browser test page is served from this same origin, but the original
// frontend may be hosted elsewhere, so CORS stays wide open on every route.
const CORS_HEADERS: &str = "Access-Control-Allow-Origin: *\r\n\
    Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
    Access-Control-Allow-Headers: Content-Type\r\n";

async fn send_response(
    stream: &mut tokio::net::TcpStream,
    status: u16,
    content_type: &str,
    body: &str,
) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n{CORS_HEADERS}Connection: close\r\n\r\n{body}",
        status_reason(status),
        body.len()
    );
    stream.write_all(response.as_bytes()).await
}

async fn send_json(
    stream: &mut tokio::net::TcpStream,
    status: u16,
    body: &serde_json::Value,
) -> std::io::Result<()> {
    let json = serde_json::to_string(body).unwrap_or_default();
    send_response(stream, status, "application/json", &json).await
}
