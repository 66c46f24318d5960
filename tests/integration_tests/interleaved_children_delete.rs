// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Spec §8 scenario 6: submit GET_CHILDREN("/p", watch=true); its reply
//! dequeues the pending record; a subsequent NodeChildrenChanged notification
//! fans out to the watch registry without touching the (by then empty) queue.

use std::{sync::Arc, time::Duration};

use bytes::BytesMut;
use tokio::sync::oneshot;
use zk_dispatcher_rs::{
    client::transport::{mock::MockTransport, Transport},
    connection::DefaultConnectionManager,
    dispatcher::{Dispatcher, SubmissionPacket},
    models::{
        common::put_ustring, opcode::OpCode, parse::ResponseBody, requests::GetChildrenRequest,
        responses::GetChildrenResponse, watch::WatchEventType,
    },
    session::DefaultSessionManager,
    watch_registry::DefaultWatchRegistry,
};

use crate::integration_tests::common::reply_frame;

#[tokio::test]
async fn get_children_reply_dequeues_then_notification_fans_out() {
    let transport = Arc::new(MockTransport::new());
    transport.push_reply(reply_frame(1, 0, |out| {
        out.extend_from_slice(&1i32.to_be_bytes());
        put_ustring(out, "child-a");
    }));
    transport.push_reply(reply_frame(-1, 0, |out| {
        out.extend_from_slice(&4i32.to_be_bytes()); // NodeChildrenChanged
        out.extend_from_slice(&3i32.to_be_bytes()); // SyncConnected
        put_ustring(out, "/p");
    }));

    let watches = Arc::new(DefaultWatchRegistry::new());
    let (tx, rx) = oneshot::channel();
    let tx = std::sync::Mutex::new(Some(tx));
    watches.register(
        "/p".into(),
        Box::new(move |evt| {
            if let Some(tx) = tx.lock().expect("mutex poisoned").take() {
                let _ = tx.send(evt.event_type);
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
    GetChildrenRequest { path: "/p".into(), watch: true }.encode(&mut body);
    let reply = dispatcher
        .submit(SubmissionPacket::Protocol(OpCode::GetChildren, body.freeze()))
        .await
        .unwrap();
    assert_eq!(
        reply.body,
        Some(ResponseBody::GetChildren(GetChildrenResponse { children: vec!["child-a".into()] }))
    );

    let event_type = tokio::time::timeout(Duration::from_secs(1), rx)
        .await
        .expect("notification did not arrive in time")
        .unwrap();
    assert_eq!(event_type, WatchEventType::NodeChildrenChanged);
}
