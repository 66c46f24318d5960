// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! ACL entries (`GetAclResponse`/`SetAclRequest`): `{ perms: i32, id: { scheme,
//! id } }`. Variable-length (two embedded `ustring`s), so decoded the same
//! hand-rolled way as the rest of the bodies in `requests.rs`/`responses.rs`.

use bytes::{Bytes, BytesMut};

use crate::{
    error::DecodeError,
    models::common::{get_i32, get_ustring, put_ustring},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id {
    pub scheme: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acl {
    pub perms: i32,
    pub id: Id,
}

pub fn decode_acl(buf: &mut Bytes) -> Result<Acl, DecodeError> {
    let perms = get_i32(buf, "acl.perms")?;
    let scheme = get_ustring(buf, "acl.id.scheme")?;
    let id = get_ustring(buf, "acl.id.id")?;
    Ok(Acl { perms, id: Id { scheme, id } })
}

pub fn decode_acl_vec(buf: &mut Bytes) -> Result<Vec<Acl>, DecodeError> {
    let count = get_i32(buf, "acl_count")?;
    if count < 0 {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(decode_acl(buf)?);
    }
    Ok(out)
}

pub fn encode_acl(acl: &Acl, out: &mut BytesMut) {
    out.extend_from_slice(&acl.perms.to_be_bytes());
    put_ustring(out, &acl.id.scheme);
    put_ustring(out, &acl.id.id);
}

pub fn encode_acl_vec(acls: &[Acl], out: &mut BytesMut) {
    out.extend_from_slice(&(acls.len() as i32).to_be_bytes());
    for acl in acls {
        encode_acl(acl, out);
    }
}

/// The well-known "open, unsafe" ACL (`world:anyone`, all permissions) used
/// by tests and by callers that do not care about access control.
pub fn open_unsafe_acl() -> Vec<Acl> {
    vec![Acl { perms: 0x1f, id: Id { scheme: "world".into(), id: "anyone".into() } }]
}
