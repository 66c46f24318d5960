// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The body decoder table (C3, §4.3): given an opcode recovered from the
//! pending record matched by xid, and a reply header whose `err` field has
//! already been read, decode the remaining bytes into the right response
//! type. Dispatch is a plain match on the opcode rather than a trait-object
//! or macro-generated table, since the opcode space is an open `i32`.

use bytes::Bytes;

use crate::{
    error::DecodeError,
    models::{
        opcode::OpCode,
        responses::{
            decode_create_response, decode_exists_response, decode_get_acl_response,
            decode_get_children2_response, decode_get_children_response,
            decode_get_data_response, decode_multi_response, decode_set_acl_response,
            decode_set_data_response, decode_sync_response, CreateResponse, ExistsResponse,
            GetAclResponse, GetChildren2Response, GetChildrenResponse, GetDataResponse,
            MultiResponse, SetAclResponse, SetDataResponse, SyncResponse,
        },
    },
};

pub use crate::models::responses::CreateSessionResponse;

/// The decoded body of a successful reply, tagged by the opcode that
/// produced it. `NoBody` covers opcodes whose reply carries nothing beyond
/// the header (`Auth`, `Ping`, `CloseSession`, `Delete`, `SetWatches`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Create(CreateResponse),
    Exists(ExistsResponse),
    GetData(GetDataResponse),
    SetData(SetDataResponse),
    GetAcl(GetAclResponse),
    SetAcl(SetAclResponse),
    GetChildren(GetChildrenResponse),
    GetChildren2(GetChildren2Response),
    Sync(SyncResponse),
    Multi(MultiResponse),
    /// The session-establishment reply. Never produced by `decode_body` (it
    /// has no opcode and no header); the dispatcher builds it directly from
    /// `decode_create_session_response`.
    Session(CreateSessionResponse),
    NoBody,
}

/// Decodes a reply body for the given opcode. Callers must only invoke this
/// when the reply header's `err` field is `0`; a non-zero `err` means the
/// body is empty regardless of opcode (§4.3) and should never reach here.
pub fn decode_body(opcode: OpCode, buf: &mut Bytes) -> Result<ResponseBody, DecodeError> {
    Ok(match opcode {
        OpCode::Create => ResponseBody::Create(decode_create_response(buf)?),
        OpCode::Exists => ResponseBody::Exists(decode_exists_response(buf)?),
        OpCode::GetData => ResponseBody::GetData(decode_get_data_response(buf)?),
        OpCode::SetData => ResponseBody::SetData(decode_set_data_response(buf)?),
        OpCode::GetAcl => ResponseBody::GetAcl(decode_get_acl_response(buf)?),
        OpCode::SetAcl => ResponseBody::SetAcl(decode_set_acl_response(buf)?),
        OpCode::GetChildren => ResponseBody::GetChildren(decode_get_children_response(buf)?),
        OpCode::GetChildren2 => ResponseBody::GetChildren2(decode_get_children2_response(buf)?),
        OpCode::Sync => ResponseBody::Sync(decode_sync_response(buf)?),
        OpCode::Multi => ResponseBody::Multi(decode_multi_response(buf)?),
        OpCode::Delete | OpCode::Auth | OpCode::Ping | OpCode::CloseSession | OpCode::SetWatches => {
            ResponseBody::NoBody
        }
    })
}
