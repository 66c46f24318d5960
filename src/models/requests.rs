// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Request bodies submitted to the dispatcher (§3). Encoding only — the
//! dispatcher never needs to decode its own requests back.

use bytes::BytesMut;

use crate::models::{
    acl::{encode_acl_vec, Acl},
    common::{put_buffer, put_bool, put_ustring, put_ustring_vec},
    opcode::OpCode,
};

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub path: String,
    pub data: Vec<u8>,
    pub acl: Vec<Acl>,
    pub flags: i32,
}

impl CreateRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        put_buffer(out, &self.data);
        encode_acl_vec(&self.acl, out);
        out.extend_from_slice(&self.flags.to_be_bytes());
    }
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub path: String,
    pub version: i32,
}

impl DeleteRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        out.extend_from_slice(&self.version.to_be_bytes());
    }
}

#[derive(Debug, Clone)]
pub struct ExistsRequest {
    pub path: String,
    pub watch: bool,
}

impl ExistsRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        put_bool(out, self.watch);
    }
}

#[derive(Debug, Clone)]
pub struct GetDataRequest {
    pub path: String,
    pub watch: bool,
}

impl GetDataRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        put_bool(out, self.watch);
    }
}

#[derive(Debug, Clone)]
pub struct SetDataRequest {
    pub path: String,
    pub data: Vec<u8>,
    pub version: i32,
}

impl SetDataRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        put_buffer(out, &self.data);
        out.extend_from_slice(&self.version.to_be_bytes());
    }
}

#[derive(Debug, Clone)]
pub struct GetAclRequest {
    pub path: String,
}

impl GetAclRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
    }
}

#[derive(Debug, Clone)]
pub struct SetAclRequest {
    pub path: String,
    pub acl: Vec<Acl>,
    pub version: i32,
}

impl SetAclRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        encode_acl_vec(&self.acl, out);
        out.extend_from_slice(&self.version.to_be_bytes());
    }
}

#[derive(Debug, Clone)]
pub struct GetChildrenRequest {
    pub path: String,
    pub watch: bool,
}

impl GetChildrenRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        put_bool(out, self.watch);
    }
}

/// Identical wire shape to `GetChildrenRequest`; kept distinct because its
/// reply carries a trailing `Stat` (§4.3).
#[derive(Debug, Clone)]
pub struct GetChildren2Request {
    pub path: String,
    pub watch: bool,
}

impl GetChildren2Request {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
        put_bool(out, self.watch);
    }
}

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub path: String,
}

impl SyncRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        put_ustring(out, &self.path);
    }
}

#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub scheme: String,
    pub auth: Vec<u8>,
}

impl AuthRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        out.extend_from_slice(&0i32.to_be_bytes()); // type, always 0
        put_ustring(out, &self.scheme);
        put_buffer(out, &self.auth);
    }
}

#[derive(Debug, Clone)]
pub struct WatchSpec {
    pub data: Vec<String>,
    pub exist: Vec<String>,
    pub child: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SetWatchesRequest {
    pub relative_zxid: i64,
    pub watches: WatchSpec,
}

impl SetWatchesRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        out.extend_from_slice(&self.relative_zxid.to_be_bytes());
        put_ustring_vec(out, &self.watches.data);
        put_ustring_vec(out, &self.watches.exist);
        put_ustring_vec(out, &self.watches.child);
    }
}

/// One operation inside a `MULTI` transaction. Each is wrapped in a
/// `MultiHeader { opcode, done, err }` before its body, per the protocol.
#[derive(Debug, Clone)]
pub enum MultiOp {
    Create(CreateRequest),
    Delete(DeleteRequest),
    SetData(SetDataRequest),
    Check { path: String, version: i32 },
}

impl MultiOp {
    fn opcode(&self) -> OpCode {
        match self {
            Self::Create(_) => OpCode::Create,
            Self::Delete(_) => OpCode::Delete,
            Self::SetData(_) => OpCode::SetData,
            Self::Check { .. } => OpCode::Exists,
        }
    }

    fn encode_body(&self, out: &mut BytesMut) {
        match self {
            Self::Create(r) => r.encode(out),
            Self::Delete(r) => r.encode(out),
            Self::SetData(r) => r.encode(out),
            Self::Check { path, version } => {
                put_ustring(out, path);
                out.extend_from_slice(&version.to_be_bytes());
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MultiRequest {
    pub ops: Vec<MultiOp>,
}

impl MultiRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        for op in &self.ops {
            out.extend_from_slice(&op.opcode().as_i32().to_be_bytes());
            put_bool(out, false); // done
            out.extend_from_slice(&0i32.to_be_bytes()); // err
            op.encode_body(out);
        }
        // MultiHeader terminator: opcode -1, done true, err -1.
        out.extend_from_slice(&(-1i32).to_be_bytes());
        put_bool(out, true);
        out.extend_from_slice(&(-1i32).to_be_bytes());
    }
}

/// The un-headered session-establishment request sent once at connect time
/// (§4.8); it has no xid/opcode request header at all.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub protocol_version: i32,
    pub last_zxid_seen: i64,
    pub timeout: i32,
    pub session_id: i64,
    pub passwd: Vec<u8>,
    pub read_only: bool,
}

impl ConnectRequest {
    pub fn encode(&self, out: &mut BytesMut) {
        out.extend_from_slice(&self.protocol_version.to_be_bytes());
        out.extend_from_slice(&self.last_zxid_seen.to_be_bytes());
        out.extend_from_slice(&self.timeout.to_be_bytes());
        out.extend_from_slice(&self.session_id.to_be_bytes());
        put_buffer(out, &self.passwd);
        put_bool(out, self.read_only);
    }
}
