// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The watch registry collaborator (§6, C4): fans out decoded watch events to
//! user-registered observers keyed by path, backed by a `dashmap::DashMap`
//! so registration and fan-out never contend on a single global lock.

use dashmap::DashMap;

use crate::models::watch::WatchEvent;

pub type Observer = Box<dyn Fn(&WatchEvent) + Send + Sync>;

pub trait WatchRegistry: Send + Sync {
    fn register(&self, path: String, observer: Observer);
    fn process(&self, event: WatchEvent);
}

#[derive(Default)]
pub struct DefaultWatchRegistry {
    observers: DashMap<String, Vec<Observer>>,
}

impl DefaultWatchRegistry {
    pub fn new() -> Self {
        Self { observers: DashMap::new() }
    }
}

impl WatchRegistry for DefaultWatchRegistry {
    fn register(&self, path: String, observer: Observer) {
        self.observers.entry(path).or_default().push(observer);
    }

    /// Fans the event out to every observer registered on its path, then
    /// clears them: ZooKeeper watches are one-shot by convention, and this
    /// dispatcher does not re-arm them on the caller's behalf.
    fn process(&self, event: WatchEvent) {
        if let Some((_, observers)) = self.observers.remove(&event.path) {
            for observer in &observers {
                observer(&event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::watch::{KeeperState, WatchEventType};

    #[test]
    fn fans_out_to_registered_observers_and_clears_them() {
        let registry = DefaultWatchRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        registry.register(
            "/a".into(),
            Box::new(move |evt| seen_clone.lock().unwrap().push(evt.path.clone())),
        );

        let event = WatchEvent {
            event_type: WatchEventType::NodeDataChanged,
            state: KeeperState::SyncConnected,
            path: "/a".into(),
        };
        registry.process(event.clone());
        assert_eq!(*seen.lock().unwrap(), vec!["/a".to_string()]);

        // One-shot: processing the same path again finds nothing registered.
        seen.lock().unwrap().clear();
        registry.process(event);
        assert!(seen.lock().unwrap().is_empty());
    }
}
