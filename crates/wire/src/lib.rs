// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response contract between the client and an execution host.
//!
//! Wire format: JSON bodies over HTTP `POST`, one endpoint per operation.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod request;
mod response;

pub use codec::{decode, encode, ProtocolError};
pub use request::{
    CancelJobRequest, Endpoint, PollStatusRequest, StartJobRequest, ValidateNextRequest,
};
pub use response::{
    ActionSetResult, CancelJobResponse, EdgeLayer, EdgeValidation, Progress, RawLogEntry,
    StartJobResponse, StatusSnapshot, ValidateNextResponse, ValidationItem,
};

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
