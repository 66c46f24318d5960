// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Watch notifications (C4, §4.4): `{ type, state, path }`, decoded whenever
//! a reply header's xid is `-1`.

use bytes::Bytes;

use crate::{
    error::DecodeError,
    models::common::get_ustring,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventType {
    None,
    NodeCreated,
    NodeDeleted,
    NodeDataChanged,
    NodeChildrenChanged,
}

impl WatchEventType {
    fn from_i32(v: i32) -> Self {
        match v {
            1 => Self::NodeCreated,
            2 => Self::NodeDeleted,
            3 => Self::NodeDataChanged,
            4 => Self::NodeChildrenChanged,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeeperState {
    Disconnected,
    SyncConnected,
    AuthFailed,
    ConnectedReadOnly,
    SaslAuthenticated,
    Expired,
    Unknown(i32),
}

impl KeeperState {
    fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::Disconnected,
            3 => Self::SyncConnected,
            4 => Self::AuthFailed,
            5 => Self::ConnectedReadOnly,
            6 => Self::SaslAuthenticated,
            -112 => Self::Expired,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub event_type: WatchEventType,
    pub state: KeeperState,
    pub path: String,
}

/// Decodes the body of an unsolicited notification (the reply header with
/// xid `-1` has already been consumed by the caller).
pub fn decode_watch_event(buf: &mut Bytes) -> Result<WatchEvent, DecodeError> {
    use bytes::Buf;
    if buf.remaining() < 8 {
        return Err(DecodeError::Body {
            opcode: -1,
            reason: "watch event: need 8 bytes for type+state".into(),
        });
    }
    let event_type = WatchEventType::from_i32(buf.get_i32());
    let state = KeeperState::from_i32(buf.get_i32());
    let path = get_ustring(buf, "watch.path")?;
    Ok(WatchEvent { event_type, state, path })
}
