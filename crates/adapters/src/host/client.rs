// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `HostAdapter` over the host gateway's HTTP API.

use super::http::{post_json, HttpResponse, TransportError};
use super::{is_not_found_message, CancelError, HostAdapter, PollError, StartError, ValidateError};
use async_trait::async_trait;
use hw_core::{JobId, JobKind, RoutingHint, SessionId};
use hw_wire::{
    decode, encode, CancelJobRequest, CancelJobResponse, Endpoint, PollStatusRequest,
    StartJobRequest, StartJobResponse, StatusSnapshot, ValidateNextRequest, ValidateNextResponse,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one gateway address (`host:port`).
#[derive(Clone, Debug)]
pub struct HttpHostAdapter {
    addr: Arc<str>,
    token: Option<Arc<str>>,
    timeout: Duration,
}

impl HttpHostAdapter {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: Arc::from(addr.into()), token: None, timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Arc::from(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn post<T: Serialize>(
        &self,
        endpoint: Endpoint,
        request: &T,
    ) -> Result<HttpResponse, TransportError> {
        let body = encode(request).map_err(|e| TransportError(format!("encode failed: {e}")))?;
        tracing::debug!(%endpoint, addr = %self.addr, "host request");
        post_json(&self.addr, endpoint.path(), &body, self.token.as_deref(), self.timeout).await
    }
}

fn http_message(response: &HttpResponse) -> String {
    let body = response.body.trim();
    // Prefer the host's own error text when the body is a JSON error object
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| if body.is_empty() { "empty response".to_string() } else { body.to_string() })
}

#[async_trait]
impl HostAdapter for HttpHostAdapter {
    async fn start(
        &self,
        kind: JobKind,
        parameters: serde_json::Value,
        routing: &RoutingHint,
    ) -> Result<JobId, StartError> {
        let request = StartJobRequest { kind, parameters, routing_hint: routing.clone() };
        let response = self
            .post(Endpoint::StartJob, &request)
            .await
            .map_err(|e| StartError::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(StartError::Rejected(format!(
                "HTTP {}: {}",
                response.status,
                http_message(&response)
            )));
        }
        let body: StartJobResponse = decode(&response.body)
            .map_err(|e| StartError::Rejected(format!("invalid start response: {e}")))?;
        if !body.success {
            return Err(StartError::Rejected(
                body.error.unwrap_or_else(|| "host reported failure".to_string()),
            ));
        }
        match body.job_id {
            Some(id) if !id.trim().is_empty() => Ok(JobId::new(id.trim())),
            _ => Err(StartError::Rejected("start response carried no job_id".to_string())),
        }
    }

    async fn poll(
        &self,
        job_id: &JobId,
        routing: &RoutingHint,
    ) -> Result<StatusSnapshot, PollError> {
        let request = PollStatusRequest { job_id: job_id.clone(), routing_hint: routing.clone() };
        let response = self
            .post(Endpoint::PollStatus, &request)
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;
        if response.status == 404 {
            return Err(PollError::NotFound(http_message(&response)));
        }
        if !response.is_success() {
            return Err(PollError::Transient {
                status: response.status,
                message: http_message(&response),
            });
        }
        let snapshot: StatusSnapshot =
            decode(&response.body).map_err(|e| PollError::Malformed(e.to_string()))?;
        if !snapshot.success {
            let message = snapshot.error.unwrap_or_else(|| "host reported failure".to_string());
            if is_not_found_message(&message) {
                return Err(PollError::NotFound(message));
            }
            return Err(PollError::Transient { status: response.status, message });
        }
        Ok(snapshot)
    }

    async fn cancel(&self, job_id: &JobId, routing: &RoutingHint) -> Result<(), CancelError> {
        let request = CancelJobRequest { job_id: job_id.clone(), routing_hint: routing.clone() };
        let response = self
            .post(Endpoint::CancelJob, &request)
            .await
            .map_err(|e| CancelError::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(CancelError::Rejected(format!(
                "HTTP {}: {}",
                response.status,
                http_message(&response)
            )));
        }
        // Some hosts answer cancel with an empty body
        if response.body.trim().is_empty() {
            return Ok(());
        }
        let body: CancelJobResponse = decode(&response.body)
            .map_err(|e| CancelError::Rejected(format!("invalid cancel response: {e}")))?;
        if body.success {
            Ok(())
        } else {
            Err(CancelError::Rejected(body.error.unwrap_or_else(|| "host refused".to_string())))
        }
    }

    async fn validate_next(
        &self,
        session_id: &SessionId,
        routing: &RoutingHint,
    ) -> Result<ValidateNextResponse, ValidateError> {
        let request =
            ValidateNextRequest { session_id: session_id.clone(), routing_hint: routing.clone() };
        let response = self
            .post(Endpoint::ValidateNextItem, &request)
            .await
            .map_err(|e| ValidateError::Transport(e.to_string()))?;
        if response.status == 404 {
            return Err(ValidateError::NotFound(http_message(&response)));
        }
        if !response.is_success() {
            return Err(ValidateError::Rejected(format!(
                "HTTP {}: {}",
                response.status,
                http_message(&response)
            )));
        }
        let body: ValidateNextResponse = decode(&response.body)
            .map_err(|e| ValidateError::Rejected(format!("invalid validation response: {e}")))?;
        if !body.success {
            return Err(ValidateError::Rejected(
                body.error.unwrap_or_else(|| "host reported failure".to_string()),
            ));
        }
        Ok(body)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
