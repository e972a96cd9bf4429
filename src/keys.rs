use crate::dom::{Document, NodeId};

/// Every action the global key listener can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PrintReport,
    SubmitFirstForm,
    CloseModals,
}

#[derive(Debug, Clone)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
}

/// Maps a key event to its action. Ctrl+P prints, Ctrl+S submits, Escape
/// closes modals regardless of modifiers; everything else is unbound.
pub fn resolve(press: &KeyPress) -> Option<Action> {
    if press.ctrl && press.key == "p" {
        return Some(Action::PrintReport);
    }
    if press.ctrl && press.key == "s" {
        return Some(Action::SubmitFirstForm);
    }
    if press.key == "Escape" {
        return Some(Action::CloseModals);
    }
    None
}

/// The first form in document order. The save shortcut targets this form
/// unconditionally, not the focused one.
pub fn first_form(doc: &Document) -> Option<NodeId> {
    if doc.tag(doc.root()) == "form" {
        return Some(doc.root());
    }
    doc.first_by_tag(doc.root(), "form")
}

/// Hides every visible modal by dropping its `show` class. Returns how many
/// were closed.
pub fn close_open_modals(doc: &mut Document) -> usize {
    let open: Vec<NodeId> = doc
        .all_with_class(doc.root(), "modal")
        .into_iter()
        .filter(|&n| doc.has_class(n, "show"))
        .collect();
    for modal in &open {
        doc.remove_class(*modal, "show");
    }
    open.len()
}
