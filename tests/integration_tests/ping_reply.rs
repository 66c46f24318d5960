// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Spec §4.6: a reply with xid -2 is a heartbeat. It dequeues the head of
//! the pending queue without xid verification and completes it with a
//! header-only reply.

use std::sync::Arc;

use bytes::Bytes;
use zk_dispatcher_rs::{client::transport::mock::MockTransport, dispatcher::SubmissionPacket, models::opcode::OpCode};

use crate::integration_tests::common::{configured_dispatcher, reply_frame};

#[tokio::test]
async fn ping_reply_completes_with_header_only() {
    let transport = Arc::new(MockTransport::new());
    transport.push_reply(reply_frame(-2, 0, |_| {}));
    let dispatcher = configured_dispatcher(Arc::clone(&transport)).await;

    let reply =
        dispatcher.submit(SubmissionPacket::Protocol(OpCode::Ping, Bytes::new())).await.unwrap();

    assert_eq!(reply.header.unwrap().xid, -2);
    assert!(reply.body.is_none());
}
