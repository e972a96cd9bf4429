use crate::ipc::error::ok;
use crate::ipc::helpers::{page_mut, required_bool};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

const CHECKBOX_CLASS: &str = "attendance-checkbox";
const SELECT_ALL_ID: &str = "selectAll";

/// Bulk check/uncheck of the attendance checkbox group, mirrored onto the
/// select-all control when the page has one.
fn handle_set_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let checked = match required_bool(req, "checked") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let boxes = page.doc.all_with_class(page.doc.root(), CHECKBOX_CLASS);
    for node in &boxes {
        page.doc.set_checked(*node, checked);
    }
    if let Some(select_all) = page.doc.by_id(SELECT_ALL_ID) {
        page.doc.set_checked(select_all, checked);
    }
    ok(&req.id, json!({ "updated": boxes.len() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "selection.setAll" => Some(handle_set_all(state, req)),
        _ => None,
    }
}
