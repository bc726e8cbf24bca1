use std::sync::Arc;

use kasane_client::{DispatchResult, Dispatcher, HttpTransport, Operation, Transport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A request as seen on the wire.
struct CapturedRequest {
    head: String,
    body: String,
}

/// Accepts one connection, captures the request and answers with `status`
/// and `body`. Returns the base URL and a receiver for the captured request.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        let (head, body_start) = loop {
            let read = stream.read(&mut chunk).await.unwrap();
            assert!(read > 0, "client closed before sending headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&buffer[..pos]).to_string(), pos + 4);
            }
        };

        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buffer.len() < body_start + content_length {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
        }
        let request_body = String::from_utf8_lossy(&buffer[body_start..]).to_string();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        let _ = tx.send(CapturedRequest {
            head,
            body: request_body,
        });
    });

    (format!("http://{}", addr), rx)
}

/// A base URL on which nothing is listening.
async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_transport_posts_json() {
    let (base_url, captured) = serve_once("200 OK", r#"{"session_id":"abc"}"#).await;

    let transport = HttpTransport::new();
    let response = transport
        .post_json(&format!("{}/login", base_url), r#"{"username":"admin"}"#)
        .await
        .expect("Should get a response");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"session_id":"abc"}"#);

    let request = captured.await.unwrap();
    assert!(request.head.starts_with("POST /login "));
    assert!(
        request
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/json")
    );
    assert_eq!(request.body, r#"{"username":"admin"}"#);
}

#[tokio::test]
async fn test_dispatcher_surfaces_server_error() {
    let (base_url, _captured) = serve_once("500 Internal Server Error", "internal error").await;

    let dispatcher = Dispatcher::new(Arc::new(HttpTransport::new()), "http://localhost:5173");
    let result = dispatcher.dispatch(&base_url, Operation::Execute, "{}").await;

    assert_eq!(
        result,
        DispatchResult::HttpError {
            status: 500,
            body: "internal error".to_string()
        }
    );
}

#[tokio::test]
async fn test_dispatcher_connection_refused_is_network_error() {
    let base_url = closed_port_url().await;

    let dispatcher = Dispatcher::new(Arc::new(HttpTransport::new()), "http://localhost:5173");
    let result = dispatcher.dispatch(&base_url, Operation::Execute, "{}").await;

    assert!(matches!(result, DispatchResult::NetworkError(ref message) if !message.is_empty()));
}
