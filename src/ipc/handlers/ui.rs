use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_str, page_mut, required_bool, required_str};
use crate::ipc::types::{AppState, Request};
use crate::notify::DISMISS_AFTER;
use serde_json::json;
use std::time::Instant;

/// One call per loaded page: registers what the markup asks for and queues
/// the already-rendered alerts for auto-dismissal.
fn handle_ui_init(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let report = page.bindings.rewire(&page.doc);

    let alerts = page.doc.all_with_class(page.doc.root(), "alert");
    let deadline = Instant::now() + DISMISS_AFTER;
    for alert in &alerts {
        page.removals.schedule(*alert, deadline);
    }

    ok(
        &req.id,
        json!({
            "tooltips": report.tooltips,
            "popovers": report.popovers,
            "searchInputs": report.searches,
            "validatedForms": report.validated_forms,
            "percentageBound": report.percentage_bound,
            "autoDismissAlerts": alerts.len()
        }),
    )
}

fn handle_set_loading(state: &mut AppState, req: &Request) -> serde_json::Value {
    let element_id = match required_str(req, "elementId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let loading = match required_bool(req, "loading") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(node) = page.doc.by_id(&element_id) else {
        return ok(&req.id, json!({ "updated": false }));
    };
    if loading {
        page.doc.set_attr(node, "disabled", "disabled");
        page.doc.set_text(node, "Loading...");
    } else {
        page.doc.remove_attr(node, "disabled");
        let original = optional_str(req, "originalText").unwrap_or_default();
        page.doc.set_text(node, &original);
    }
    ok(&req.id, json!({ "updated": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "ui.init" => Some(handle_ui_init(state, req)),
        "ui.setLoading" => Some(handle_set_loading(state, req)),
        _ => None,
    }
}
