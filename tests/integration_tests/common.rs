// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Shared fixtures for the end-to-end dispatcher scenarios (spec §8).

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use zk_dispatcher_rs::{
    client::transport::mock::MockTransport,
    connection::DefaultConnectionManager,
    dispatcher::{Dispatcher, SubmissionPacket},
    session::DefaultSessionManager,
    watch_registry::DefaultWatchRegistry,
};

/// Builds one reply frame: `{xid, zxid, err}` header followed by a caller
/// supplied body.
pub fn reply_frame(xid: i32, err: i32, body: impl FnOnce(&mut BytesMut)) -> Bytes {
    let mut out = BytesMut::new();
    out.put_i32(xid);
    out.put_i64(0); // zxid, opaque to the dispatcher
    out.put_i32(err);
    body(&mut out);
    out.freeze()
}

/// A dispatcher wired with the default collaborator managers and already
/// past the two configuration packets, ready to `submit` protocol requests.
pub async fn configured_dispatcher(transport: Arc<MockTransport>) -> Arc<Dispatcher> {
    let dispatcher = Dispatcher::new(transport as Arc<dyn zk_dispatcher_rs::client::transport::Transport>);
    dispatcher
        .submit(SubmissionPacket::ConfigureManagers {
            connection: Arc::new(DefaultConnectionManager::new()),
            session: Arc::new(DefaultSessionManager::new()),
            watches: Arc::new(DefaultWatchRegistry::new()),
        })
        .await
        .unwrap();
    dispatcher.submit(SubmissionPacket::ConfigureDone).await.unwrap();
    dispatcher
}
