// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The session manager collaborator (§6): holds the small amount of
//! connection-lifecycle state the correlator needs (is the session closing?
//! what keeper state did the last watch event report?) plus the heartbeat
//! scheduler the dispatcher cancels on failure.
//!
//! The ping scheduler is a thin wrapper around a `CancellationToken`,
//! cancelled exactly once when the dispatcher fails.

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use crate::models::watch::{KeeperState, WatchEvent};

#[derive(Debug, Default)]
pub struct PingScheduler {
    token: CancellationToken,
}

impl PingScheduler {
    pub fn new() -> Self {
        Self { token: CancellationToken::new() }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub trait SessionManager: Send + Sync {
    fn is_closing_session(&self) -> bool;
    fn parse_watch_event(&self, event: &WatchEvent);
    fn ping_scheduler(&self) -> &PingScheduler;
    fn set_state(&self, state: KeeperState);
}

#[derive(Debug)]
pub struct DefaultSessionManager {
    state: Mutex<KeeperState>,
    ping_scheduler: PingScheduler,
}

impl DefaultSessionManager {
    pub fn new() -> Self {
        Self { state: Mutex::new(KeeperState::Disconnected), ping_scheduler: PingScheduler::new() }
    }

    pub fn state(&self) -> KeeperState {
        *self.state.lock().expect("session state mutex poisoned")
    }
}

impl Default for DefaultSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager for DefaultSessionManager {
    /// Expired or explicitly closed sessions stop the read loop from the
    /// orchestrator's perspective; this default implementation never closes
    /// on its own, leaving that call to the embedding application.
    fn is_closing_session(&self) -> bool {
        matches!(self.state(), KeeperState::Expired)
    }

    fn parse_watch_event(&self, event: &WatchEvent) {
        self.set_state(event.state);
    }

    fn ping_scheduler(&self) -> &PingScheduler {
        &self.ping_scheduler
    }

    fn set_state(&self, state: KeeperState) {
        *self.state.lock().expect("session state mutex poisoned") = state;
    }
}
