use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_str, page_mut, required_index, required_str};
use crate::ipc::types::{AppState, Request};
use crate::table;
use serde_json::json;

fn handle_bind_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let input_id = match required_str(req, "inputId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let table_id = match required_str(req, "tableId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(input) = page.doc.by_id(&input_id) else {
        return ok(&req.id, json!({ "bound": false }));
    };
    page.bindings.register_search(input, &table_id);
    ok(&req.id, json!({ "bound": true }))
}

/// A key-release in a search input: refilter the bound table against the
/// input's current value.
fn handle_event_keyup(state: &mut AppState, req: &Request) -> serde_json::Value {
    let target_id = match required_str(req, "targetId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(target) = page.doc.by_id(&target_id) else {
        return ok(&req.id, json!({ "filtered": false }));
    };
    if let Some(value) = optional_str(req, "value") {
        page.doc.set_value(target, &value);
    }
    let Some(binding) = page.bindings.search_for(target) else {
        return ok(&req.id, json!({ "filtered": false }));
    };
    let table_id = binding.table_id.clone();
    let Some(table) = page.doc.by_id(&table_id) else {
        return ok(&req.id, json!({ "filtered": false }));
    };
    let filter = page.doc.value(target).to_string();
    let (shown, hidden) = table::search_rows(&mut page.doc, table, &filter);
    ok(
        &req.id,
        json!({ "filtered": true, "shown": shown, "hidden": hidden }),
    )
}

fn handle_sort(state: &mut AppState, req: &Request) -> serde_json::Value {
    let table_id = match required_str(req, "tableId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let column = match required_index(req, "column") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let kind = table::SortKind::parse(
        optional_str(req, "type").as_deref().unwrap_or("string"),
    );
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(node) = page.doc.by_id(&table_id) else {
        return ok(&req.id, json!({ "sorted": false }));
    };
    table::sort_rows(&mut page.doc, node, column, kind);
    ok(&req.id, json!({ "sorted": true }))
}

/// Serializes the whole table and hands the CSV back for the host to
/// download.
fn handle_export_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let table_id = match required_str(req, "tableId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filename = optional_str(req, "filename")
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| table::DEFAULT_EXPORT_FILENAME.to_string());
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(node) = page.doc.by_id(&table_id) else {
        return ok(&req.id, json!({ "exported": false }));
    };
    let csv = table::table_to_csv(&page.doc, node);
    ok(
        &req.id,
        json!({ "exported": true, "filename": filename, "csv": csv }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "table.bindSearch" => Some(handle_bind_search(state, req)),
        "event.keyup" => Some(handle_event_keyup(state, req)),
        "table.sort" => Some(handle_sort(state, req)),
        "table.exportCsv" => Some(handle_export_csv(state, req)),
        _ => None,
    }
}
