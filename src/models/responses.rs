// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Response bodies (§3, §4.3): one decode function per opcode, called from
//! the body decoder table in `parse.rs` once a reply header with `err == 0`
//! has been read.

use bytes::Bytes;

use crate::{
    error::DecodeError,
    models::{
        acl::{decode_acl_vec, Acl},
        common::{get_buffer, get_i64, get_ustring, get_ustring_vec},
        stat::{decode_stat, Stat},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResponse {
    pub path: String,
}

pub fn decode_create_response(buf: &mut Bytes) -> Result<CreateResponse, DecodeError> {
    Ok(CreateResponse { path: get_ustring(buf, "create.path")? })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistsResponse {
    pub stat: Stat,
}

pub fn decode_exists_response(buf: &mut Bytes) -> Result<ExistsResponse, DecodeError> {
    Ok(ExistsResponse { stat: decode_stat(buf)? })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDataResponse {
    pub stat: Stat,
}

pub fn decode_set_data_response(buf: &mut Bytes) -> Result<SetDataResponse, DecodeError> {
    Ok(SetDataResponse { stat: decode_stat(buf)? })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetAclResponse {
    pub stat: Stat,
}

pub fn decode_set_acl_response(buf: &mut Bytes) -> Result<SetAclResponse, DecodeError> {
    Ok(SetAclResponse { stat: decode_stat(buf)? })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDataResponse {
    pub data: Bytes,
    pub stat: Stat,
}

pub fn decode_get_data_response(buf: &mut Bytes) -> Result<GetDataResponse, DecodeError> {
    let data = get_buffer(buf, "get_data.data")?;
    let stat = decode_stat(buf)?;
    Ok(GetDataResponse { data, stat })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAclResponse {
    pub acl: Vec<Acl>,
    pub stat: Stat,
}

pub fn decode_get_acl_response(buf: &mut Bytes) -> Result<GetAclResponse, DecodeError> {
    let acl = decode_acl_vec(buf)?;
    let stat = decode_stat(buf)?;
    Ok(GetAclResponse { acl, stat })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetChildrenResponse {
    pub children: Vec<String>,
}

pub fn decode_get_children_response(buf: &mut Bytes) -> Result<GetChildrenResponse, DecodeError> {
    Ok(GetChildrenResponse { children: get_ustring_vec(buf, "children")? })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetChildren2Response {
    pub children: Vec<String>,
    pub stat: Stat,
}

pub fn decode_get_children2_response(buf: &mut Bytes) -> Result<GetChildren2Response, DecodeError> {
    let children = get_ustring_vec(buf, "children")?;
    let stat = decode_stat(buf)?;
    Ok(GetChildren2Response { children, stat })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResponse {
    pub path: String,
}

pub fn decode_sync_response(buf: &mut Bytes) -> Result<SyncResponse, DecodeError> {
    Ok(SyncResponse { path: get_ustring(buf, "sync.path")? })
}

/// One completed operation inside a `MULTI` reply. Per the binding decision
/// in the design notes, a `MULTI` is all-or-nothing: a failing op aborts the
/// whole transaction and the dispatcher surfaces a single top-level error
/// rather than a per-op result list, so this type only appears on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiOpResult {
    Create(CreateResponse),
    Delete,
    SetData(SetDataResponse),
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiResponse {
    pub results: Vec<MultiOpResult>,
}

/// Decodes a successful `MULTI` reply: a sequence of `MultiHeader { opcode,
/// done, err }` + body, terminated by a header with `done == true`.
pub fn decode_multi_response(buf: &mut Bytes) -> Result<MultiResponse, DecodeError> {
    use bytes::Buf;
    use crate::models::opcode::OpCode;

    let mut results = Vec::new();
    loop {
        if buf.remaining() < 9 {
            return Err(DecodeError::Body {
                opcode: 14,
                reason: "multi: truncated MultiHeader".into(),
            });
        }
        let opcode = buf.get_i32();
        let done = buf.get_u8() != 0;
        let err = buf.get_i32();
        if done {
            break;
        }
        if err != 0 {
            return Err(DecodeError::Body {
                opcode: 14,
                reason: format!("multi: op {opcode} failed with err {err}"),
            });
        }
        let op = OpCode::from_i32(opcode)?;
        let result = match op {
            OpCode::Create => MultiOpResult::Create(decode_create_response(buf)?),
            OpCode::Delete => MultiOpResult::Delete,
            OpCode::SetData => MultiOpResult::SetData(decode_set_data_response(buf)?),
            OpCode::Exists => {
                // Check ops carry no body.
                MultiOpResult::Check
            }
            other => {
                return Err(DecodeError::Body {
                    opcode: 14,
                    reason: format!("multi: unsupported nested opcode {:?}", other),
                })
            }
        };
        results.push(result);
    }
    Ok(MultiResponse { results })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionResponse {
    pub protocol_version: i32,
    pub timeout: i32,
    pub session_id: i64,
    pub passwd: Bytes,
}

/// Decodes the un-headered session-establishment reply (§4.8). Unlike every
/// other response, this one is read outside the normal pending-queue flow.
pub fn decode_create_session_response(buf: &mut Bytes) -> Result<CreateSessionResponse, DecodeError> {
    use bytes::Buf;
    if buf.remaining() < 4 {
        return Err(DecodeError::Body { opcode: 0, reason: "connect: truncated".into() });
    }
    let protocol_version = buf.get_i32();
    let timeout = crate::models::common::get_i32(buf, "connect.timeout")?;
    let session_id = get_i64(buf, "connect.session_id")?;
    let passwd = get_buffer(buf, "connect.passwd")?;
    Ok(CreateSessionResponse { protocol_version, timeout, session_id, passwd })
}
