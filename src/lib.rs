// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A client-side response dispatcher for the ZooKeeper wire protocol: the
//! layer that correlates outbound requests with inbound replies, demultiplexes
//! unsolicited watch notifications, and surfaces transport failures to every
//! outstanding submitter.

pub mod cfg;
pub mod client;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod pending;
pub mod reply;
pub mod session;
pub mod watch_registry;
