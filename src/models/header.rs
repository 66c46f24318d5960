// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Reply and request headers (§3, §4.2).
//!
//! Both are fixed-width, all-integer records, so — unlike the variable-shape
//! bodies in `requests.rs`/`responses.rs` — they are a natural fit for a
//! `zerocopy`-backed wire struct instead of a hand-rolled cursor walk.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use zerocopy::{
    byteorder::{BigEndian, I32, I64},
    FromBytes, Immutable, IntoBytes, KnownLayout,
};

use crate::{error::DecodeError, models::common::REPLY_HEADER_LEN};

/// Wire layout of a reply header: `xid(4) + zxid(8) + err(4)`, big-endian.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
struct ReplyHeaderWire {
    xid: I32<BigEndian>,
    zxid: I64<BigEndian>,
    err: I32<BigEndian>,
}

/// `{ xid, zxid, err }` as described in §3. `xid == -1` denotes a watch
/// notification, `xid == -2` denotes a ping reply, all other values are
/// matched against the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHeader {
    pub xid: i32,
    pub zxid: i64,
    pub err: i32,
}

/// Decodes the fixed-size reply header prefix (C2). If `err != 0` the header
/// is still returned successfully — body decoding is the caller's
/// responsibility per §4.2/§4.3.
pub fn decode_header(buf: &mut Bytes) -> Result<ReplyHeader, DecodeError> {
    if buf.remaining() < REPLY_HEADER_LEN {
        return Err(DecodeError::Header(format!(
            "need {REPLY_HEADER_LEN} bytes, have {}",
            buf.remaining()
        )));
    }
    let raw = buf.copy_to_bytes(REPLY_HEADER_LEN);
    let wire = ReplyHeaderWire::read_from_bytes(raw.as_ref())
        .map_err(|e| DecodeError::Header(e.to_string()))?;
    Ok(ReplyHeader { xid: wire.xid.get(), zxid: wire.zxid.get(), err: wire.err.get() })
}

/// `{ xid, opcode }` carried ahead of every protocol request body (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub xid: i32,
    pub opcode: i32,
}

pub fn encode_request_header(hdr: RequestHeader, out: &mut BytesMut) {
    out.put_i32(hdr.xid);
    out.put_i32(hdr.opcode);
}
