//! Integration tests for the HTTP transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a raw TCP client (for static assets) and a tokio-tungstenite
//! client (for the UI socket).

use std::path::Path;
use std::time::Duration;

use bee_transport::{AssetConfig, Connection, HttpTransport, Transport, TransportError};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;

fn write_assets(dir: &Path) {
    std::fs::write(dir.join("index.html"), "<h1>bee</h1>").unwrap();
    std::fs::create_dir_all(dir.join("assets")).unwrap();
    std::fs::write(dir.join("assets").join("app.js"), "console.log('hi')").unwrap();
}

async fn start(dir: &Path) -> HttpTransport {
    HttpTransport::bind("127.0.0.1:0", AssetConfig::new(dir, "index.html"))
        .await
        .expect("should bind")
}

/// Sends a bare HTTP/1.1 GET and returns the full response text.
async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("tcp connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_root_serves_start_page() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let transport = start(dir.path()).await;

    let response = http_get(transport.local_addr(), "/").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("text/html"));
    assert!(response.ends_with("<h1>bee</h1>"));
}

#[tokio::test]
async fn test_named_start_page_and_nested_asset_are_served() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let transport = start(dir.path()).await;

    let page = http_get(transport.local_addr(), "/index.html").await;
    assert!(page.starts_with("HTTP/1.1 200"));

    let script = http_get(transport.local_addr(), "/assets/app.js").await;
    assert!(script.starts_with("HTTP/1.1 200"));
    assert!(script.contains("text/javascript"));
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let transport = start(dir.path()).await;

    let response = http_get(transport.local_addr(), "/nope.css").await;
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");
}

#[tokio::test]
async fn test_path_traversal_is_404() {
    let outer = tempfile::tempdir().unwrap();
    let www = outer.path().join("www");
    std::fs::create_dir_all(&www).unwrap();
    write_assets(&www);
    std::fs::write(outer.path().join("secret.txt"), "hunter2").unwrap();
    let transport = start(&www).await;

    let response = http_get(transport.local_addr(), "/../secret.txt").await;
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");
    assert!(!response.contains("hunter2"));
}

#[tokio::test]
async fn test_websocket_accept_and_send_receive() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut transport = start(dir.path()).await;
    let url = format!("ws://{}/bee", transport.local_addr());

    let (mut client, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("client should connect");
    let server_conn = transport.accept().await.expect("should accept");
    assert!(server_conn.id().into_inner() > 0);

    // --- Server sends, client receives (JSON arrives as a text frame) ---
    server_conn.send(br#"{"type":"Return","call_id":1}"#).await.unwrap();
    let msg = client.next().await.unwrap().unwrap();
    assert!(msg.is_text());
    assert_eq!(msg.into_data().as_ref(), br#"{"type":"Return","call_id":1}"#);

    // --- Client sends, server receives ---
    client
        .send(Message::Text("hello from the page".into()))
        .await
        .unwrap();
    let received = server_conn.recv().await.unwrap().expect("should have data");
    assert_eq!(received, b"hello from the page");

    server_conn.close().await.expect("close should succeed");
}

#[tokio::test]
async fn test_websocket_recv_returns_none_on_client_close() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut transport = start(dir.path()).await;
    let url = format!("ws://{}/bee", transport.local_addr());

    let (mut client, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
    let server_conn = transport.accept().await.unwrap();

    client.send(Message::Close(None)).await.unwrap();

    let result = server_conn.recv().await.expect("recv should not error");
    assert!(result.is_none(), "should return None on client close");
}

#[tokio::test]
async fn test_bind_to_taken_port_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let first = start(dir.path()).await;

    let result = HttpTransport::bind(
        &first.local_addr().to_string(),
        AssetConfig::new(dir.path(), "index.html"),
    )
    .await;
    assert!(matches!(result, Err(TransportError::BindFailed { .. })));
}

#[tokio::test]
async fn test_accept_after_shutdown_reports_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut transport = start(dir.path()).await;

    transport.shutdown().await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), transport.accept())
        .await
        .expect("accept should resolve after shutdown");
    assert!(matches!(result, Err(TransportError::Shutdown)));
}
