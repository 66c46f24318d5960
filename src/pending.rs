// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The pending queue (C5, §4.5): a FIFO of outstanding request records paired
//! with the result slot their reply eventually completes.
//!
//! Guarded by a single `tokio::sync::Mutex` rather than a lock-free
//! structure — the queue's invariants (I1-I3) depend on enqueue, dequeue,
//! and drain all observing a consistent snapshot, which a
//! `Mutex<VecDeque<_>>` gives for free.

use std::collections::VecDeque;

use tokio::sync::{oneshot, Mutex};

use crate::{error::DispatchError, models::opcode::OpCode, reply::ReplyPacket};

/// What kind of reply a pending record expects. Almost every record expects
/// a normal header-prefixed protocol reply; the one exception is the
/// session-connect record, whose reply has no header at all (§4.3) and must
/// be decoded directly by the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Protocol(OpCode),
    Connect,
}

/// A request record (§3): enough information to associate an inbound reply
/// with the submitter that is waiting on it. `xid` is `None` only for the
/// session-connect record.
#[derive(Debug, Clone, Copy)]
pub struct PendingEntry {
    pub kind: PendingKind,
    pub xid: Option<i32>,
}

type ResultSlot = oneshot::Sender<Result<ReplyPacket, DispatchError>>;

pub struct PendingQueue {
    inner: Mutex<VecDeque<(PendingEntry, ResultSlot)>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self { inner: Mutex::new(VecDeque::new()) }
    }

    /// Appends a new outstanding record. Callers hold the same lock across
    /// this call and the transport write that follows, so that no reply can
    /// be observed for a record the read loop has not yet seen (I1).
    pub async fn enqueue(&self, entry: PendingEntry, slot: ResultSlot) {
        self.inner.lock().await.push_back((entry, slot));
    }

    /// Non-destructively inspects the oldest outstanding record's kind, used
    /// by the read loop to choose between the header-less connect path and
    /// the normal header-prefixed path before committing to a dequeue.
    pub async fn front_kind(&self) -> Option<PendingKind> {
        self.inner.lock().await.front().map(|(e, _)| e.kind)
    }

    /// Pops the oldest record and hands back its slot for completion. Used
    /// once the correlator has verified (or decided not to verify, for PING)
    /// the xid association.
    pub async fn dequeue(&self) -> Option<(PendingEntry, ResultSlot)> {
        self.inner.lock().await.pop_front()
    }

    /// Removes the most recently enqueued record. Used only to roll back a
    /// submission whose write failed with a non-fatal transport error right
    /// after enqueueing, while the submitter still holds the critical
    /// section that serializes enqueue-and-write (so no other submitter can
    /// have enqueued behind it in the meantime).
    pub async fn pop_back(&self) -> Option<(PendingEntry, ResultSlot)> {
        self.inner.lock().await.pop_back()
    }

    /// Drains every outstanding record, completing each slot with a
    /// cancellation carrying `cause` (I3). Called exactly once, from
    /// `Dispatcher::fail`, under the same mutex that guards enqueue/dequeue
    /// so a decode racing the failure cannot double-complete a slot that
    /// drain already removed.
    pub async fn drain(&self, cause: &DispatchError) {
        let mut guard = self.inner.lock().await;
        for (_, slot) in guard.drain(..) {
            let _ = slot.send(Err(DispatchError::cancellation(cause)));
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn enqueue_then_dequeue_is_fifo() {
        let q = PendingQueue::new();
        let (tx1, _rx1) = oneshot::channel();
        let (tx2, _rx2) = oneshot::channel();
        q.enqueue(PendingEntry { kind: PendingKind::Protocol(OpCode::Create), xid: Some(1) }, tx1)
            .await;
        q.enqueue(PendingEntry { kind: PendingKind::Protocol(OpCode::Delete), xid: Some(2) }, tx2)
            .await;

        let (first, _) = q.dequeue().await.unwrap();
        assert_eq!(first.xid, Some(1));
        let (second, _) = q.dequeue().await.unwrap();
        assert_eq!(second.xid, Some(2));
        assert!(q.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn drain_completes_every_slot_with_cancellation() {
        let q = PendingQueue::new();
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        q.enqueue(PendingEntry { kind: PendingKind::Protocol(OpCode::Exists), xid: Some(1) }, tx1)
            .await;
        q.enqueue(PendingEntry { kind: PendingKind::Protocol(OpCode::Exists), xid: Some(2) }, tx2)
            .await;

        let cause = DispatchError::Association { expected: 1, actual: 9 };
        q.drain(&cause).await;

        assert!(rx1.await.unwrap().is_err());
        assert!(rx2.await.unwrap().is_err());
        assert_eq!(q.len().await, 0);
    }

    #[tokio::test]
    async fn connect_record_is_visible_via_front_kind() {
        let q = PendingQueue::new();
        let (tx, _rx) = oneshot::channel();
        q.enqueue(PendingEntry { kind: PendingKind::Connect, xid: None }, tx).await;
        assert_eq!(q.front_kind().await, Some(PendingKind::Connect));
    }
}
