// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Spec §8 scenario 2: submit EXISTS("/a", watch=true), receive its reply,
//! then an unsolicited NodeDataChanged notification for the same path fans
//! out to the watch registry without ever touching the pending queue.

use std::{sync::Arc, time::Duration};

use bytes::BytesMut;
use tokio::sync::oneshot;
use zk_dispatcher_rs::{
    client::transport::{mock::MockTransport, Transport},
    connection::DefaultConnectionManager,
    dispatcher::{Dispatcher, SubmissionPacket},
    models::{
        opcode::OpCode, parse::ResponseBody, requests::ExistsRequest,
        watch::{KeeperState, WatchEvent, WatchEventType},
    },
    session::DefaultSessionManager,
    watch_registry::DefaultWatchRegistry,
};

use crate::integration_tests::common::reply_frame;

#[tokio::test]
async fn watch_notification_fans_out_without_dequeuing() {
    let transport = Arc::new(MockTransport::new());
    // Stat bytes for the EXISTS reply body (11 fixed-width fields).
    transport.push_reply(reply_frame(1, 0, |out| {
        for _ in 0..8 {
            out.extend_from_slice(&0i64.to_be_bytes());
        }
        out.extend_from_slice(&0i32.to_be_bytes());
    }));
    // Unsolicited notification: xid=-1, then watch-event body.
    transport.push_reply(reply_frame(-1, 0, |out| {
        out.extend_from_slice(&3i32.to_be_bytes()); // NodeDataChanged
        out.extend_from_slice(&3i32.to_be_bytes()); // SyncConnected
        zk_dispatcher_rs::models::common::put_ustring(out, "/a");
    }));

    let watches = Arc::new(DefaultWatchRegistry::new());
    let (tx, rx) = oneshot::channel();
    let tx = std::sync::Mutex::new(Some(tx));
    watches.register(
        "/a".into(),
        Box::new(move |evt: &WatchEvent| {
            if let Some(tx) = tx.lock().expect("watch tx mutex poisoned").take() {
                let _ = tx.send(evt.clone());
            }
        }),
    );

    let dispatcher = Dispatcher::new(transport as Arc<dyn Transport>);
    dispatcher
        .submit(SubmissionPacket::ConfigureManagers {
            connection: Arc::new(DefaultConnectionManager::new()),
            session: Arc::new(DefaultSessionManager::new()),
            watches: Arc::clone(&watches) as Arc<dyn zk_dispatcher_rs::watch_registry::WatchRegistry>,
        })
        .await
        .unwrap();
    dispatcher.submit(SubmissionPacket::ConfigureDone).await.unwrap();

    let mut body = BytesMut::new();
    ExistsRequest { path: "/a".into(), watch: true }.encode(&mut body);
    let reply =
        dispatcher.submit(SubmissionPacket::Protocol(OpCode::Exists, body.freeze())).await.unwrap();
    assert!(matches!(reply.body, Some(ResponseBody::Exists(_))));

    let event = tokio::time::timeout(Duration::from_secs(1), rx)
        .await
        .expect("watch event did not arrive in time")
        .unwrap();
    assert_eq!(event.event_type, WatchEventType::NodeDataChanged);
    assert_eq!(event.state, KeeperState::SyncConnected);
    assert_eq!(event.path, "/a");
}
