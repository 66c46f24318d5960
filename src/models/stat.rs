// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `Stat`: the fixed-width metadata record attached to most successful
//! replies (`ExistsResponse`, `SetDataResponse`, `GetDataResponse`, ...).
//! Every field is a plain integer, so — like the reply header — it maps
//! directly onto a `zerocopy` struct instead of a hand-rolled cursor walk.

use bytes::{Buf, Bytes};
use zerocopy::{
    byteorder::{BigEndian, I32, I64},
    FromBytes, Immutable, IntoBytes, KnownLayout,
};

use crate::error::DecodeError;

pub const STAT_LEN: usize = 6 * 8 + 5 * 4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
struct StatWire {
    czxid: I64<BigEndian>,
    mzxid: I64<BigEndian>,
    ctime: I64<BigEndian>,
    mtime: I64<BigEndian>,
    version: I32<BigEndian>,
    cversion: I32<BigEndian>,
    aversion: I32<BigEndian>,
    ephemeral_owner: I64<BigEndian>,
    data_length: I32<BigEndian>,
    num_children: I32<BigEndian>,
    pzxid: I64<BigEndian>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stat {
    pub czxid: i64,
    pub mzxid: i64,
    pub ctime: i64,
    pub mtime: i64,
    pub version: i32,
    pub cversion: i32,
    pub aversion: i32,
    pub ephemeral_owner: i64,
    pub data_length: i32,
    pub num_children: i32,
    pub pzxid: i64,
}

pub fn decode_stat(buf: &mut Bytes) -> Result<Stat, DecodeError> {
    if buf.remaining() < STAT_LEN {
        return Err(DecodeError::Body {
            opcode: 0,
            reason: format!("stat: need {STAT_LEN} bytes, have {}", buf.remaining()),
        });
    }
    let raw = buf.copy_to_bytes(STAT_LEN);
    let wire = StatWire::read_from_bytes(raw.as_ref())
        .map_err(|e| DecodeError::Body { opcode: 0, reason: e.to_string() })?;
    Ok(Stat {
        czxid: wire.czxid.get(),
        mzxid: wire.mzxid.get(),
        ctime: wire.ctime.get(),
        mtime: wire.mtime.get(),
        version: wire.version.get(),
        cversion: wire.cversion.get(),
        aversion: wire.aversion.get(),
        ephemeral_owner: wire.ephemeral_owner.get(),
        data_length: wire.data_length.get(),
        num_children: wire.num_children.get(),
        pzxid: wire.pzxid.get(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::{BufMut, BytesMut};

    use super::*;

    #[test]
    fn decodes_a_stat_record() {
        let mut raw = BytesMut::new();
        raw.put_i64(1); // czxid
        raw.put_i64(1); // mzxid
        raw.put_i64(1000); // ctime
        raw.put_i64(1000); // mtime
        raw.put_i32(0); // version
        raw.put_i32(0); // cversion
        raw.put_i32(0); // aversion
        raw.put_i64(0); // ephemeralOwner
        raw.put_i32(5); // dataLength
        raw.put_i32(0); // numChildren
        raw.put_i64(1); // pzxid
        let mut bytes = raw.freeze();
        let stat = decode_stat(&mut bytes).unwrap();
        assert_eq!(stat.data_length, 5);
        assert_eq!(stat.czxid, 1);
        assert!(bytes.is_empty());
    }

    #[test]
    fn truncated_stat_errors() {
        let mut bytes = Bytes::from_static(&[0u8; 4]);
        assert!(decode_stat(&mut bytes).is_err());
    }
}
