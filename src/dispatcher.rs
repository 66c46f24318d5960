// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The dispatcher orchestrator (C8, §4.8): the public entry point that
//! correlates submissions with replies over a single `Transport`, fans watch
//! notifications out to the watch registry, and fails the whole pending
//! pipeline on any unrecoverable transport or protocol error.
//!
//! Spawns its read loop exactly once via `tokio::spawn`, lazily on first
//! submission rather than eagerly at construction time.

use std::sync::{
    atomic::{AtomicBool, AtomicI32, Ordering},
    Arc,
};

use bytes::Bytes;
use tokio::sync::{oneshot, Mutex, RwLock};
use tracing::{debug, warn};

use crate::{
    client::transport::Transport,
    connection::ConnectionManager,
    error::{DecodeError, DispatchError, TransportError},
    models::{
        header::{decode_header, encode_request_header, RequestHeader},
        opcode::{OpCode, NOTIFICATION_XID, PING_XID},
        parse::{decode_body, ResponseBody},
        requests::ConnectRequest,
        responses::decode_create_session_response,
        watch::{decode_watch_event, KeeperState},
    },
    pending::{PendingEntry, PendingKind, PendingQueue},
    reply::ReplyPacket,
    session::SessionManager,
    watch_registry::WatchRegistry,
};

/// One submission to the dispatcher (§3, §9). The configuration variants
/// bypass the pending queue entirely; `Connect` enqueues with an absent xid;
/// `Protocol` carries an already-encoded request body alongside the opcode
/// that will decode its reply.
pub enum SubmissionPacket {
    ConfigureManagers {
        connection: Arc<dyn ConnectionManager>,
        session: Arc<dyn SessionManager>,
        watches: Arc<dyn WatchRegistry>,
    },
    ConfigureDone,
    Connect(ConnectRequest),
    Protocol(OpCode, Bytes),
}

struct Managers {
    connection: Arc<dyn ConnectionManager>,
    session: Arc<dyn SessionManager>,
    watches: Arc<dyn WatchRegistry>,
}

pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    queue: PendingQueue,
    xid_counter: AtomicI32,
    has_failed: AtomicBool,
    read_loop_started: AtomicBool,
    configured: AtomicBool,
    /// Serializes submitters so enqueue and write happen as one critical
    /// section (I1) and so the read loop is spawned at most once.
    submit_lock: Mutex<()>,
    managers: RwLock<Option<Managers>>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            queue: PendingQueue::new(),
            xid_counter: AtomicI32::new(1),
            has_failed: AtomicBool::new(false),
            read_loop_started: AtomicBool::new(false),
            configured: AtomicBool::new(false),
            submit_lock: Mutex::new(()),
            managers: RwLock::new(None),
        })
    }

    pub fn has_failed(&self) -> bool {
        self.has_failed.load(Ordering::Acquire)
    }

    fn next_xid(&self) -> i32 {
        self.xid_counter.fetch_add(1, Ordering::AcqRel)
    }

    pub async fn submit(
        self: &Arc<Self>,
        packet: SubmissionPacket,
    ) -> Result<ReplyPacket, DispatchError> {
        if self.has_failed() {
            return Err(DispatchError::Cancelled("dispatcher has already failed".into()));
        }

        match packet {
            SubmissionPacket::ConfigureManagers { connection, session, watches } => {
                *self.managers.write().await = Some(Managers { connection, session, watches });
                Ok(ReplyPacket { header: None, body: None })
            }
            SubmissionPacket::ConfigureDone => {
                self.configured.store(true, Ordering::Release);
                Ok(ReplyPacket { header: None, body: None })
            }
            SubmissionPacket::Connect(req) => {
                let mut body = bytes::BytesMut::new();
                req.encode(&mut body);
                self.enqueue_write_and_await(PendingKind::Connect, None, body.freeze()).await
            }
            SubmissionPacket::Protocol(opcode, body) => {
                let xid = self.next_xid();
                let mut out = bytes::BytesMut::with_capacity(8 + body.len());
                encode_request_header(RequestHeader { xid, opcode: opcode.as_i32() }, &mut out);
                out.extend_from_slice(&body);
                self.enqueue_write_and_await(PendingKind::Protocol(opcode), Some(xid), out.freeze())
                    .await
            }
        }
    }

    /// The shared tail of `submit` for the two queue-visiting variants
    /// (`Connect`, `Protocol`): enqueue, write, start the read loop if
    /// necessary, all under `submit_lock`, then wait for the result slot.
    async fn enqueue_write_and_await(
        self: &Arc<Self>,
        kind: PendingKind,
        xid: Option<i32>,
        wire_bytes: Bytes,
    ) -> Result<ReplyPacket, DispatchError> {
        let (tx, rx) = oneshot::channel();
        {
            let _guard = self.submit_lock.lock().await;
            self.queue.enqueue(PendingEntry { kind, xid }, tx).await;

            if let Err(e) = self.transport.write(wire_bytes).await {
                let fatal = matches!(e, TransportError::Channel(_) | TransportError::Write(_));
                if fatal {
                    self.fail(DispatchError::Transport(e)).await;
                } else if let Some((_, slot)) = self.queue.pop_back().await {
                    let _ = slot.send(Err(DispatchError::Transport(e)));
                }
                // The slot is either already completed by `fail`'s drain or
                // by the branch above; `rx.await` below observes it either
                // way, so we fall through instead of returning early.
            } else if !self.read_loop_started.swap(true, Ordering::AcqRel) {
                let me = Arc::clone(self);
                tokio::spawn(async move {
                    me.read_loop().await;
                });
            }
        }

        rx.await.unwrap_or_else(|_| {
            Err(DispatchError::Cancelled("result slot dropped without completion".into()))
        })
    }

    /// Fails the dispatcher: idempotent, cancels the heartbeat scheduler,
    /// marks the connection invalid, and drains every pending slot with a
    /// cancellation carrying `cause` (I3).
    pub async fn fail(&self, cause: DispatchError) {
        if self.has_failed.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err()
        {
            return;
        }
        warn!(error = %cause, "dispatcher failed");
        if let Some(managers) = self.managers.read().await.as_ref() {
            managers.session.ping_scheduler().cancel();
            managers.connection.mark_invalid();
        }
        self.queue.drain(&cause).await;
    }

    async fn read_loop(self: Arc<Self>) {
        loop {
            if self.has_failed() {
                return;
            }
            if let Some(managers) = self.managers.read().await.as_ref() {
                if managers.session.is_closing_session() {
                    debug!("session closing, read loop exiting");
                    return;
                }
            }

            let frame = match self.transport.read().await {
                Ok(frame) => frame,
                Err(e) => {
                    if matches!(e, TransportError::Other(_)) {
                        if let Some((_, slot)) = self.queue.dequeue().await {
                            let _ = slot.send(Err(DispatchError::Transport(e)));
                        }
                        continue;
                    }
                    self.fail(DispatchError::Transport(e)).await;
                    return;
                }
            };
            let mut buf = frame;

            if self.queue.front_kind().await == Some(PendingKind::Connect) {
                match decode_create_session_response(&mut buf) {
                    Ok(resp) => {
                        if let Some(managers) = self.managers.read().await.as_ref() {
                            managers.session.set_state(KeeperState::SyncConnected);
                        }
                        if let Some((_, slot)) = self.queue.dequeue().await {
                            let _ = slot.send(Ok(ReplyPacket::connect(ResponseBody::Session(resp))));
                        }
                    }
                    Err(e) => self.fail(DispatchError::Decode(e)).await,
                }
                continue;
            }

            // A header-decode failure may mean this frame was never a
            // headered reply at all but a watch notification (§4.2/§7); try
            // that reading before giving up on the frame entirely.
            let header_buf = buf.clone();
            let header = match decode_header(&mut buf) {
                Ok(h) => h,
                Err(header_err) => {
                    let mut fallback = header_buf;
                    match decode_watch_event(&mut fallback) {
                        Ok(event) => {
                            if let Some(managers) = self.managers.read().await.as_ref() {
                                managers.session.parse_watch_event(&event);
                                managers.watches.process(event);
                            }
                            continue;
                        }
                        Err(_) => {
                            self.fail(DispatchError::Decode(header_err)).await;
                            return;
                        }
                    }
                }
            };

            if header.xid == NOTIFICATION_XID {
                match decode_watch_event(&mut buf) {
                    Ok(event) => {
                        if let Some(managers) = self.managers.read().await.as_ref() {
                            managers.session.parse_watch_event(&event);
                            managers.watches.process(event);
                        }
                    }
                    Err(e) => self.fail(DispatchError::Decode(e)).await,
                }
                continue;
            }

            if header.xid == PING_XID {
                match self.queue.dequeue().await {
                    Some((entry, slot)) => {
                        if matches!(entry.kind, PendingKind::Protocol(OpCode::Ping)) {
                            let _ = slot.send(Ok(ReplyPacket::header_only(header)));
                        } else {
                            let cause = DispatchError::ProtocolViolation(
                                "ping reply did not match a PING record".into(),
                            );
                            let _ = slot.send(Err(cause.clone()));
                            self.fail(cause).await;
                            return;
                        }
                    }
                    None => {
                        self.fail(DispatchError::ProtocolViolation(
                            "ping reply arrived on an empty pending queue".into(),
                        ))
                        .await;
                        return;
                    }
                }
                continue;
            }

            match self.queue.dequeue().await {
                Some((entry, slot)) => {
                    if entry.xid != Some(header.xid) {
                        let cause = DispatchError::Association {
                            expected: entry.xid.unwrap_or(header.xid),
                            actual: header.xid,
                        };
                        let _ = slot.send(Err(cause.clone()));
                        self.fail(cause).await;
                        return;
                    }
                    let PendingKind::Protocol(opcode) = entry.kind else {
                        let cause = DispatchError::ProtocolViolation(
                            "matched a connect record against a headered reply".into(),
                        );
                        let _ = slot.send(Err(cause.clone()));
                        self.fail(cause).await;
                        return;
                    };
                    if header.err != 0 {
                        let _ = slot.send(Ok(ReplyPacket::header_only(header)));
                        continue;
                    }
                    match decode_body(opcode, &mut buf) {
                        Ok(body) => {
                            let _ = slot.send(Ok(ReplyPacket::with_body(header, body)));
                        }
                        Err(e) => {
                            let _ = slot.send(Err(DispatchError::Decode(e)));
                        }
                    }
                }
                None => {
                    self.fail(DispatchError::ProtocolViolation(format!(
                        "reply xid={} arrived on an empty pending queue",
                        header.xid
                    )))
                    .await;
                    return;
                }
            }
        }
    }
}
