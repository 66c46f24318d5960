// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Error taxonomy for the dispatcher (see design §7).
//!
//! Transport errors are dispatcher-wide; decode errors are per-request;
//! server-reported errors (`header.err != 0`) are data, not exceptions, and
//! never appear here.

use thiserror::Error;

/// Errors surfaced by the `Transport` contract (§6).
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    /// The channel itself is gone (EOF, reset, broken pipe). Fails the
    /// dispatcher.
    #[error("transport channel error: {0}")]
    Channel(String),
    /// A write-side failure surfaced either directly from `write()` or while
    /// reading (e.g. the peer reset after we wrote). Fails the dispatcher.
    #[error("transport write error: {0}")]
    Write(String),
    /// Anything else (timeout, malformed framing). Cancels only the current
    /// front entry; the read loop may continue.
    #[error("transport error: {0}")]
    Other(String),
}

/// Errors raised while decoding a header or a reply body.
#[derive(Debug, Error, Clone)]
pub enum DecodeError {
    #[error("failed to decode reply header: {0}")]
    Header(String),
    #[error("failed to decode body for opcode {opcode:?}: {reason}")]
    Body { opcode: i32, reason: String },
    #[error("unknown opcode: {0}")]
    UnknownOpcode(i32),
}

/// Top-level error type returned to callers of `Dispatcher::submit`.
#[derive(Debug, Error, Clone)]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The reply header's xid did not match the head of the pending queue.
    /// Per the corrected design (§9), this is fatal: it fails the dispatcher.
    #[error("xid mismatch: pending head xid={expected}, reply xid={actual}")]
    Association { expected: i32, actual: i32 },

    /// `submit` was called, or a reply arrived, after the dispatcher already
    /// failed.
    #[error("dispatcher has failed: {0}")]
    Cancelled(String),

    /// The dispatcher hit an unrecoverable state inconsistency (e.g. a PING
    /// reply arriving on an empty queue, or a watch notification referencing
    /// an empty queue with a non-notification xid).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl DispatchError {
    /// Builds the cancellation error every pending slot is completed with
    /// when `fail` drains the queue.
    pub fn cancellation(cause: &DispatchError) -> Self {
        DispatchError::Cancelled(cause.to_string())
    }
}
