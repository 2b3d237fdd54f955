// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON body encoding shared by the HTTP client and tests.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty response body")]
    Empty,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ProtocolError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}
