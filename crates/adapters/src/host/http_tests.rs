// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

async fn parse(raw: &str) -> Result<HttpResponse, TransportError> {
    let mut reader = BufReader::new(raw.as_bytes());
    read_http_response(&mut reader).await
}

#[tokio::test]
async fn reads_content_length_body() {
    let response = parse("HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\nbody-extra").await.unwrap();
    assert_eq!(response, HttpResponse { status: 200, body: "body".into() });
    assert!(response.is_success());
}

#[tokio::test]
async fn header_match_is_case_insensitive() {
    let response = parse("HTTP/1.1 404 Not Found\r\ncontent-LENGTH: 2\r\n\r\n{}").await.unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.body, "{}");
    assert!(!response.is_success());
}

#[tokio::test]
async fn missing_content_length_reads_to_eof() {
    let response = parse("HTTP/1.1 500 Internal\r\n\r\nupstream down").await.unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.body, "upstream down");
}

#[tokio::test]
async fn oversized_content_length_is_transport_error() {
    let err = parse("HTTP/1.1 200 OK\r\nContent-Length: 18446744073709551615\r\n\r\n{}")
        .await
        .unwrap_err();
    assert!(err.0.contains("exceeds"), "{err}");
}

#[tokio::test]
async fn short_body_is_transport_error() {
    let err = parse("HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n{}").await.unwrap_err();
    assert!(err.0.contains("expected 10 bytes, got 2"), "{err}");
}

#[tokio::test]
async fn garbage_status_line_is_transport_error() {
    let err = parse("hello\r\n\r\n").await.unwrap_err();
    assert!(err.0.contains("malformed status line"), "{err}");
}

#[tokio::test]
async fn post_json_sends_body_and_token() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(&mut socket);
        let mut head = String::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            if line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        let mut body = vec![0u8; 11];
        reader.read_exact(&mut body).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok")
            .await
            .unwrap();
        (head, String::from_utf8(body).unwrap())
    });

    let response =
        post_json(&addr, "/server/jobs/status", r#"{"a":"bcd"}"#, Some("s3cret"), Duration::from_secs(5))
            .await
            .unwrap();
    assert_eq!(response.body, "ok");

    let (head, body) = server.await.unwrap();
    assert!(head.starts_with("POST /server/jobs/status HTTP/1.1"), "{head}");
    assert!(head.contains("Authorization: Bearer s3cret"), "{head}");
    assert_eq!(body, r#"{"a":"bcd"}"#);
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let _server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let err = post_json(&addr, "/x", "{}", None, Duration::from_millis(50)).await.unwrap_err();
    assert!(err.0.contains("timed out"), "{err}");
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = post_json(&addr, "/x", "{}", None, Duration::from_secs(1)).await.unwrap_err();
    assert!(err.0.contains("connect"), "{err}");
}
