// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Spec §8 invariant P6: reply delivery order equals submission order.
//! Three deletes are submitted back to back (their futures polled together
//! via `tokio::join!`, not awaited individually) and each must come back
//! carrying the xid its own submission was assigned, in submission order.

use std::sync::Arc;

use bytes::BytesMut;
use zk_dispatcher_rs::{
    client::transport::mock::MockTransport, dispatcher::SubmissionPacket,
    models::{opcode::OpCode, requests::DeleteRequest},
};

use crate::integration_tests::common::{configured_dispatcher, reply_frame};

#[tokio::test]
async fn replies_are_delivered_in_submission_order() {
    let transport = Arc::new(MockTransport::new());
    transport.push_reply(reply_frame(1, 0, |_| {}));
    transport.push_reply(reply_frame(2, 0, |_| {}));
    transport.push_reply(reply_frame(3, 0, |_| {}));
    let dispatcher = configured_dispatcher(Arc::clone(&transport)).await;

    let delete_body = |path: &str| {
        let mut out = BytesMut::new();
        DeleteRequest { path: path.into(), version: -1 }.encode(&mut out);
        out.freeze()
    };

    let f1 = dispatcher.submit(SubmissionPacket::Protocol(OpCode::Delete, delete_body("/a")));
    let f2 = dispatcher.submit(SubmissionPacket::Protocol(OpCode::Delete, delete_body("/b")));
    let f3 = dispatcher.submit(SubmissionPacket::Protocol(OpCode::Delete, delete_body("/c")));

    let (r1, r2, r3) = tokio::join!(f1, f2, f3);

    assert_eq!(r1.unwrap().header.unwrap().xid, 1);
    assert_eq!(r2.unwrap().header.unwrap().xid, 2);
    assert_eq!(r3.unwrap().header.unwrap().xid, 3);
}
