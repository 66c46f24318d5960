// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The `Transport` contract (A1, §6) and its concrete TCP implementation.
//!
//! `TcpTransport` splits a `tokio::net::TcpStream` into owned halves, each
//! guarded by its own `tokio::sync::Mutex` so reads and writes never block
//! each other, with `io_with_timeout` bounding every socket operation and a
//! `CancellationToken` available to abort both sides promptly. Every frame
//! is a plain 4-byte big-endian length prefix (A1), matching the ZooKeeper
//! client protocol.

use async_trait::async_trait;
use bytes::{Buf, Bytes, BytesMut};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    sync::Mutex,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{client::common::io_with_timeout, error::TransportError};

/// A framed byte channel: `read()` yields one complete frame's payload
/// (length prefix already stripped), `write()` accepts one frame's payload
/// (length prefix added by the implementation).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn read(&self) -> Result<Bytes, TransportError>;
    async fn write(&self, payload: Bytes) -> Result<(), TransportError>;
}

/// Maximum accepted frame length: guards against a corrupted or malicious
/// length prefix causing an unbounded allocation.
const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

pub struct TcpTransport {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    io_timeout: std::time::Duration,
    cancel: CancellationToken,
}

impl TcpTransport {
    pub async fn connect(
        address: &str,
        connect_timeout: std::time::Duration,
        io_timeout: std::time::Duration,
        cancel: CancellationToken,
    ) -> Result<Self, TransportError> {
        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| TransportError::Channel(format!("connect to {address} timed out")))?
            .map_err(|e| TransportError::Channel(format!("connect to {address} failed: {e}")))?;
        stream
            .set_nodelay(true)
            .map_err(|e| TransportError::Channel(format!("set_nodelay failed: {e}")))?;
        let (r, w) = stream.into_split();
        Ok(Self { reader: Mutex::new(r), writer: Mutex::new(w), io_timeout, cancel })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read(&self) -> Result<Bytes, TransportError> {
        let mut len_buf = [0u8; 4];
        {
            let mut r = self.reader.lock().await;
            io_with_timeout("read frame length", r.read_exact(&mut len_buf), self.io_timeout, &self.cancel)
                .await
                .map_err(|e| TransportError::Channel(e.to_string()))?;
        }
        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::Other(format!("frame length {len} exceeds maximum")));
        }

        let mut payload = BytesMut::with_capacity(len);
        payload.resize(len, 0);
        {
            let mut r = self.reader.lock().await;
            io_with_timeout("read frame payload", r.read_exact(&mut payload), self.io_timeout, &self.cancel)
                .await
                .map_err(|e| TransportError::Channel(e.to_string()))?;
        }
        debug!(frame_len = len, "read frame");
        Ok(payload.freeze())
    }

    async fn write(&self, payload: Bytes) -> Result<(), TransportError> {
        let mut framed = BytesMut::with_capacity(4 + payload.len());
        framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        framed.extend_from_slice(&payload);

        let mut w = self.writer.lock().await;
        io_with_timeout("write frame", w.write_all(&framed), self.io_timeout, &self.cancel)
            .await
            .map_err(|e| TransportError::Write(e.to_string()))?;
        debug!(frame_len = payload.len(), "wrote frame");
        Ok(())
    }
}

/// An in-memory `Transport` used by dispatcher tests (see `tests/`): reads
/// are served from a preloaded queue of frames, writes are recorded for
/// assertions. Kept alongside the production impl rather than under
/// `#[cfg(test)]` so integration tests in `tests/` can use it too.
pub mod mock {
    use std::sync::Mutex as StdMutex;

    use super::*;

    #[derive(Default)]
    pub struct MockTransport {
        inbound: StdMutex<std::collections::VecDeque<Bytes>>,
        pub outbound: StdMutex<Vec<Bytes>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_reply(&self, frame: Bytes) {
            self.inbound.lock().unwrap().push_back(frame);
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn read(&self) -> Result<Bytes, TransportError> {
            self.inbound
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| TransportError::Channel("mock transport exhausted".into()))
        }

        async fn write(&self, payload: Bytes) -> Result<(), TransportError> {
            self.outbound.lock().unwrap().push(payload);
            Ok(())
        }
    }
}
