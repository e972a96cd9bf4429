use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_bool, page_mut, required_str};
use crate::ipc::types::{AppState, Request};
use crate::keys::{self, Action, KeyPress};
use serde_json::json;

/// A global key press. Print and submit come back as directives for the
/// host to execute; modal closing mutates the tree directly.
fn handle_key_down(state: &mut AppState, req: &Request) -> serde_json::Value {
    let key = match required_str(req, "key") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let press = KeyPress {
        key,
        ctrl: optional_bool(req, "ctrl").unwrap_or(false),
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match keys::resolve(&press) {
        Some(Action::PrintReport) => ok(&req.id, json!({ "action": "print", "print": true })),
        Some(Action::SubmitFirstForm) => match keys::first_form(&page.doc) {
            Some(form) => {
                let form_id = page.doc.get(form).and_then(|el| el.id.clone());
                ok(&req.id, json!({ "action": "submit", "formId": form_id }))
            }
            None => ok(&req.id, json!({ "action": null })),
        },
        Some(Action::CloseModals) => {
            let closed = keys::close_open_modals(&mut page.doc);
            ok(
                &req.id,
                json!({ "action": "closeModals", "closedModals": closed }),
            )
        }
        None => ok(&req.id, json!({ "action": null })),
    }
}

fn handle_print(_state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "print": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "key.down" => Some(handle_key_down(state, req)),
        "report.print" => Some(handle_print(state, req)),
        _ => None,
    }
}
