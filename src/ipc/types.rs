use crate::autosave::SaveTransport;
use crate::bindings::Bindings;
use crate::dom::{Document, ElementSnapshot};
use crate::notify::{NotificationCenter, RemovalQueue};
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub page: Option<Page>,
    pub transport: Box<dyn SaveTransport>,
}

/// One loaded page: the injected document plus everything registered or
/// created against it.
pub struct Page {
    pub doc: Document,
    pub bindings: Bindings,
    pub notifications: NotificationCenter,
    pub removals: RemovalQueue,
}

impl Page {
    pub fn new(snapshot: &ElementSnapshot) -> Page {
        Page {
            doc: Document::from_snapshot(snapshot),
            bindings: Bindings::default(),
            notifications: NotificationCenter::default(),
            removals: RemovalQueue::default(),
        }
    }

    /// Settles due removals and expired notifications. Runs at the top of
    /// every request turn, which stands in for "a later turn of the event
    /// loop" in a process without timers.
    pub fn settle_due(&mut self, now: Instant) -> usize {
        self.removals.settle(&mut self.doc, now)
            + self.notifications.purge_expired(&mut self.doc, now)
    }
}
