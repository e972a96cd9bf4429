use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, page_mut, required_str};
use crate::ipc::types::{AppState, Request};
use crate::notify::NotifyKind;
use serde_json::json;
use std::time::Instant;

fn handle_show(state: &mut AppState, req: &Request) -> serde_json::Value {
    let message = match required_str(req, "message") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let kind = NotifyKind::parse(optional_str(req, "kind").as_deref().unwrap_or("info"));
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let id = page
        .notifications
        .show(&mut page.doc, &message, kind, Instant::now());
    ok(
        &req.id,
        json!({ "notificationId": id, "kind": kind.as_str() }),
    )
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let items: Vec<serde_json::Value> = page
        .notifications
        .live()
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "message": n.message,
                "kind": n.kind.as_str(),
                "created": n.created.to_rfc3339(),
            })
        })
        .collect();
    ok(&req.id, json!({ "notifications": items }))
}

fn handle_dismiss(state: &mut AppState, req: &Request) -> serde_json::Value {
    let notification_id = match required_str(req, "notificationId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if page.notifications.dismiss(&mut page.doc, &notification_id) {
        ok(&req.id, json!({ "dismissed": true }))
    } else {
        err(&req.id, "not_found", "no such notification", None)
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notify.show" => Some(handle_show(state, req)),
        "notify.list" => Some(handle_list(state, req)),
        "notify.dismiss" => Some(handle_dismiss(state, req)),
        _ => None,
    }
}
