// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 client for the host gateway's TCP API.
//!
//! Sends one `POST` per connection (`Connection: close`) and reads the
//! response using Content-Length framing, falling back to read-to-EOF when
//! the server omits the header.

use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Largest response body accepted from the host.
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Network-level failure: nothing usable came back from the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP POST with a JSON body and an optional bearer token.
pub async fn post_json(
    addr: &str,
    path: &str,
    body: &str,
    token: Option<&str>,
    timeout: Duration,
) -> Result<HttpResponse, TransportError> {
    let auth = token.map(|t| format!("Authorization: Bearer {t}\r\n")).unwrap_or_default();
    let request = format!(
        "POST {path} HTTP/1.1\r\nHost: {addr}\r\n{auth}Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    timed_request(addr, &request, timeout).await
}

/// Connect, send, and read under one deadline covering the whole exchange,
/// so a host that accepts but never answers cannot stall a poll loop.
async fn timed_request(
    addr: &str,
    request: &str,
    timeout: Duration,
) -> Result<HttpResponse, TransportError> {
    tokio::time::timeout(timeout, send_request(addr, request))
        .await
        .map_err(|_| TransportError(format!("request to {addr} timed out after {timeout:?}")))?
}

async fn send_request(addr: &str, request: &str) -> Result<HttpResponse, TransportError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|e| TransportError(format!("connect to {addr} failed: {e}")))?;
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| TransportError(format!("write failed: {e}")))?;

    let mut reader = BufReader::new(&mut stream);
    read_http_response(&mut reader).await
}

/// Read and parse one HTTP/1.1 response from a buffered stream.
pub(crate) async fn read_http_response<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<HttpResponse, TransportError> {
    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .await
        .map_err(|e| TransportError(format!("read status failed: {e}")))?;

    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| TransportError(format!("malformed status line: {:?}", status_line.trim())))?;

    // Headers; Content-Length is matched case-insensitively
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| TransportError(format!("read header failed: {e}")))?;
        if read == 0 || line == "\r\n" || line == "\n" {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(val) = lower.strip_prefix("content-length:") {
            content_length = val.trim().parse().ok();
        }
    }

    let body = match content_length {
        Some(0) => String::new(),
        Some(len) => {
            if len as u64 > MAX_BODY_BYTES {
                return Err(TransportError(format!(
                    "response body of {len} bytes exceeds {MAX_BODY_BYTES} byte limit"
                )));
            }
            let buf = read_body(reader, len as u64).await?;
            if buf.len() < len {
                return Err(TransportError(format!(
                    "read body failed: expected {len} bytes, got {}",
                    buf.len()
                )));
            }
            String::from_utf8_lossy(&buf).into_owned()
        }
        None => {
            let buf = read_body(reader, MAX_BODY_BYTES + 1).await?;
            if buf.len() as u64 > MAX_BODY_BYTES {
                return Err(TransportError(format!(
                    "response body exceeds {MAX_BODY_BYTES} byte limit"
                )));
            }
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    Ok(HttpResponse { status, body })
}

/// Read at most `limit` bytes, stopping early at EOF.
async fn read_body<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
    limit: u64,
) -> Result<Vec<u8>, TransportError> {
    let mut buf = Vec::new();
    reader
        .take(limit)
        .read_to_end(&mut buf)
        .await
        .map_err(|e| TransportError(format!("read body failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
