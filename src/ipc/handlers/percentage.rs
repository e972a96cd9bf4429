use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_str, page_mut, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_recalc(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let percent = calc::recalc_percentage(&mut page.doc);
    ok(
        &req.id,
        json!({ "updated": percent.is_some(), "percent": percent }),
    )
}

/// An input event. Recomputes the percentage display when the target is one
/// of the two bound marks fields; synchronous on every keystroke.
fn handle_event_input(state: &mut AppState, req: &Request) -> serde_json::Value {
    let target_id = match required_str(req, "targetId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(target) = page.doc.by_id(&target_id) else {
        return ok(&req.id, json!({ "updated": false }));
    };
    if let Some(value) = optional_str(req, "value") {
        page.doc.set_value(target, &value);
    }
    if !page.bindings.percentage_watches(target) {
        return ok(&req.id, json!({ "updated": false }));
    }
    let percent = calc::recalc_percentage(&mut page.doc);
    ok(
        &req.id,
        json!({ "updated": percent.is_some(), "percent": percent }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "percentage.recalc" => Some(handle_recalc(state, req)),
        "event.input" => Some(handle_event_input(state, req)),
        _ => None,
    }
}
