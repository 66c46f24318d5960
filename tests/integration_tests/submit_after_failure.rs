// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Spec §8 boundary behavior B3: once the dispatcher has failed, a further
//! submission completes immediately with a cancellation and never reaches
//! the transport.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use zk_dispatcher_rs::{
    client::transport::mock::MockTransport, dispatcher::SubmissionPacket, models::opcode::OpCode,
};

use crate::integration_tests::common::configured_dispatcher;

#[tokio::test]
async fn submit_after_failure_cancels_immediately() {
    let transport = Arc::new(MockTransport::new());
    // No replies queued: the very first read fails the dispatcher.
    let dispatcher = configured_dispatcher(Arc::clone(&transport)).await;

    let first = dispatcher.submit(SubmissionPacket::Protocol(OpCode::Ping, Bytes::new())).await;
    assert!(first.is_err());
    assert!(dispatcher.has_failed());

    let writes_before = transport.outbound.lock().unwrap().len();
    let second = tokio::time::timeout(
        Duration::from_millis(50),
        dispatcher.submit(SubmissionPacket::Protocol(OpCode::Ping, Bytes::new())),
    )
    .await
    .expect("submit after failure must not block");
    assert!(second.is_err());
    assert_eq!(transport.outbound.lock().unwrap().len(), writes_before);
}
