use crate::dom::ElementSnapshot;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::page_mut;
use crate::ipc::types::{AppState, Page, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "pageLoaded": state.page.is_some()
        }),
    )
}

fn handle_page_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("document") else {
        return err(&req.id, "bad_params", "missing params.document", None);
    };
    let snapshot: ElementSnapshot = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "bad_params",
                format!("document snapshot did not parse: {}", e),
                None,
            )
        }
    };
    let page = Page::new(&snapshot);
    let elements = page.doc.live_count();
    state.page = Some(page);
    ok(&req.id, json!({ "loaded": true, "elements": elements }))
}

fn handle_page_dump(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let snapshot = page.doc.to_snapshot();
    match serde_json::to_value(&snapshot) {
        Ok(document) => ok(&req.id, json!({ "document": document })),
        Err(e) => err(&req.id, "bad_params", format!("dump failed: {}", e), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "page.load" => Some(handle_page_load(state, req)),
        "page.dump" => Some(handle_page_dump(state, req)),
        _ => None,
    }
}
