// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Byte-cursor helpers shared by every request/response codec.
//!
//! The ZooKeeper wire format (Jute) is big-endian and almost entirely
//! variable-length: every string and byte array is a 4-byte length prefix
//! followed by its bytes (a negative length prefix decodes as empty/null).
//! There is no fixed record layout to hang a `zerocopy` struct on except the
//! reply/request headers and `Stat` (see `header.rs`, `stat.rs`), so the rest
//! of the codecs walk a `bytes::Buf` cursor by hand.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::DecodeError;

/// Length (in bytes) of a reply header: `xid(4) + zxid(8) + err(4)`.
pub const REPLY_HEADER_LEN: usize = 16;
/// Length (in bytes) of a request header: `xid(4) + opcode(4)`.
pub const REQUEST_HEADER_LEN: usize = 8;

fn truncated(field: &str) -> DecodeError {
    DecodeError::Body {
        opcode: 0,
        reason: format!("buffer truncated reading {field}"),
    }
}

/// Reads a Jute "ustring": `len: i32` followed by `len` UTF-8 bytes.
/// A negative length decodes to an empty string (the server's `null`
/// convention for optional path/data fields).
pub fn get_ustring(buf: &mut Bytes, field: &str) -> Result<String, DecodeError> {
    if buf.remaining() < 4 {
        return Err(truncated(field));
    }
    let len = buf.get_i32();
    if len < 0 {
        return Ok(String::new());
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(truncated(field));
    }
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec())
        .map_err(|e| DecodeError::Body { opcode: 0, reason: format!("{field}: {e}") })
}

/// Reads a Jute byte array: `len: i32` followed by `len` raw bytes. A
/// negative length decodes to an empty buffer (`null` data).
pub fn get_buffer(buf: &mut Bytes, field: &str) -> Result<Bytes, DecodeError> {
    if buf.remaining() < 4 {
        return Err(truncated(field));
    }
    let len = buf.get_i32();
    if len < 0 {
        return Ok(Bytes::new());
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(truncated(field));
    }
    Ok(buf.copy_to_bytes(len))
}

pub fn get_bool(buf: &mut Bytes, field: &str) -> Result<bool, DecodeError> {
    if buf.remaining() < 1 {
        return Err(truncated(field));
    }
    Ok(buf.get_u8() != 0)
}

pub fn get_i32(buf: &mut Bytes, field: &str) -> Result<i32, DecodeError> {
    if buf.remaining() < 4 {
        return Err(truncated(field));
    }
    Ok(buf.get_i32())
}

pub fn get_i64(buf: &mut Bytes, field: &str) -> Result<i64, DecodeError> {
    if buf.remaining() < 8 {
        return Err(truncated(field));
    }
    Ok(buf.get_i64())
}

/// Reads a Jute vector of `ustring`s: `count: i32` followed by `count`
/// `ustring`s.
pub fn get_ustring_vec(buf: &mut Bytes, field: &str) -> Result<Vec<String>, DecodeError> {
    let count = get_i32(buf, field)?;
    if count < 0 {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        out.push(get_ustring(buf, &format!("{field}[{i}]"))?);
    }
    Ok(out)
}

pub fn put_ustring(buf: &mut BytesMut, s: &str) {
    buf.put_i32(s.len() as i32);
    buf.put_slice(s.as_bytes());
}

pub fn put_buffer(buf: &mut BytesMut, data: &[u8]) {
    buf.put_i32(data.len() as i32);
    buf.put_slice(data);
}

pub fn put_bool(buf: &mut BytesMut, v: bool) {
    buf.put_u8(v as u8);
}

pub fn put_ustring_vec(buf: &mut BytesMut, items: &[String]) {
    buf.put_i32(items.len() as i32);
    for s in items {
        put_ustring(buf, s);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn ustring_round_trips() {
        let mut buf = BytesMut::new();
        put_ustring(&mut buf, "/a/b");
        let mut frozen = buf.freeze();
        assert_eq!(get_ustring(&mut frozen, "path").unwrap(), "/a/b");
    }

    #[test]
    fn negative_length_decodes_empty() {
        let mut buf = BytesMut::new();
        buf.put_i32(-1);
        let mut frozen = buf.freeze();
        assert_eq!(get_ustring(&mut frozen, "path").unwrap(), "");
    }

    #[test]
    fn truncated_buffer_errors() {
        let mut buf = BytesMut::new();
        buf.put_i32(10);
        buf.put_slice(b"short");
        let mut frozen = buf.freeze();
        assert!(get_ustring(&mut frozen, "path").is_err());
    }
}
