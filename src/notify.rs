use crate::dom::{Document, NodeId};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Banners and auto-dismissed alerts live this long unless closed sooner.
pub const DISMISS_AFTER: Duration = Duration::from_secs(5);

const BANNER_STYLE: &str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Danger,
    Warning,
    Info,
}

impl NotifyKind {
    /// Unknown kinds fall back to `info`.
    pub fn parse(s: &str) -> NotifyKind {
        match s {
            "success" => NotifyKind::Success,
            "danger" => NotifyKind::Danger,
            "warning" => NotifyKind::Warning,
            _ => NotifyKind::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NotifyKind::Success => "success",
            NotifyKind::Danger => "danger",
            NotifyKind::Warning => "warning",
            NotifyKind::Info => "info",
        }
    }

    fn alert_class(self) -> String {
        format!("alert-{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotifyKind,
    pub created: DateTime<Utc>,
    pub banner: NodeId,
    due: Instant,
}

/// Live transient banners. Each one owns its element; removal by timeout or
/// dismissal deletes both the record and the element.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn show(
        &mut self,
        doc: &mut Document,
        message: &str,
        kind: NotifyKind,
        now: Instant,
    ) -> String {
        let banner = doc.create_element("div");
        doc.set_classes(
            banner,
            vec![
                "alert".to_string(),
                kind.alert_class(),
                "alert-dismissible".to_string(),
                "fade".to_string(),
                "show".to_string(),
                "position-fixed".to_string(),
            ],
        );
        doc.set_attr(banner, "style", BANNER_STYLE);
        doc.set_attr(banner, "role", "alert");
        doc.set_text(banner, message);

        let close = doc.create_element("button");
        doc.add_class(close, "btn-close");
        doc.set_attr(close, "type", "button");
        doc.set_attr(close, "data-bs-dismiss", "alert");
        doc.append_child(banner, close);

        let body = doc.body();
        doc.append_child(body, banner);

        let id = Uuid::new_v4().to_string();
        self.items.push(Notification {
            id: id.clone(),
            message: message.to_string(),
            kind,
            created: Utc::now(),
            banner,
            due: now + DISMISS_AFTER,
        });
        id
    }

    pub fn dismiss(&mut self, doc: &mut Document, id: &str) -> bool {
        let Some(pos) = self.items.iter().position(|n| n.id == id) else {
            return false;
        };
        let gone = self.items.remove(pos);
        doc.remove(gone.banner);
        true
    }

    pub fn purge_expired(&mut self, doc: &mut Document, now: Instant) -> usize {
        let mut removed = 0usize;
        let mut index = 0usize;
        while index < self.items.len() {
            if self.items[index].due <= now {
                let gone = self.items.remove(index);
                doc.remove(gone.banner);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    pub fn live(&self) -> &[Notification] {
        &self.items
    }
}

/// Elements queued for removal at a deadline: the auto-dismissing alerts the
/// initializer finds already rendered into the page.
#[derive(Debug, Default)]
pub struct RemovalQueue {
    entries: Vec<(NodeId, Instant)>,
}

impl RemovalQueue {
    pub fn schedule(&mut self, node: NodeId, due: Instant) {
        self.entries.push((node, due));
    }

    pub fn settle(&mut self, doc: &mut Document, now: Instant) -> usize {
        let mut removed = 0usize;
        let mut index = 0usize;
        while index < self.entries.len() {
            let (node, due) = self.entries[index];
            if due <= now {
                self.entries.remove(index);
                if doc.alive(node) {
                    doc.remove(node);
                    removed += 1;
                }
            } else {
                index += 1;
            }
        }
        removed
    }

    #[allow(dead_code)]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
