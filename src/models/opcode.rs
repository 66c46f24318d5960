// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The ZooKeeper request/response opcode space.
//!
//! Every protocol request header carries a 4-byte signed opcode; replies
//! carry no opcode of their own (§4.2) — the caller recovers it from the
//! pending record matched by xid.

use crate::error::DecodeError;

/// All opcodes this dispatcher understands (a subset of RFC/ZK's full set,
/// matching §4.3's body-decoder table plus the request-only opcodes needed
/// to exercise it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum OpCode {
    Create = 1,
    Delete = 2,
    Exists = 3,
    GetData = 4,
    SetData = 5,
    GetAcl = 6,
    SetAcl = 7,
    GetChildren = 8,
    Sync = 9,
    Ping = 11,
    GetChildren2 = 12,
    Multi = 14,
    Auth = 100,
    SetWatches = 101,
    CloseSession = -11,
}

impl OpCode {
    #[inline]
    pub fn from_i32(v: i32) -> Result<Self, DecodeError> {
        Ok(match v {
            1 => Self::Create,
            2 => Self::Delete,
            3 => Self::Exists,
            4 => Self::GetData,
            5 => Self::SetData,
            6 => Self::GetAcl,
            7 => Self::SetAcl,
            8 => Self::GetChildren,
            9 => Self::Sync,
            11 => Self::Ping,
            12 => Self::GetChildren2,
            14 => Self::Multi,
            100 => Self::Auth,
            101 => Self::SetWatches,
            -11 => Self::CloseSession,
            other => return Err(DecodeError::UnknownOpcode(other)),
        })
    }

    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether a successful (`err == 0`) reply to this opcode carries a body,
    /// per the §4.3 table. `CREATE_SESSION` is handled out of band (it has no
    /// header at all) and is not represented by this enum.
    #[inline]
    pub const fn reply_has_body(self) -> bool {
        !matches!(
            self,
            Self::Auth | Self::Ping | Self::CloseSession | Self::Delete | Self::SetWatches
        )
    }
}

/// xid reserved for watch notifications (never a real pending record).
pub const NOTIFICATION_XID: i32 = -1;
/// xid reserved for heartbeat (ping) replies.
pub const PING_XID: i32 = -2;
