use crate::autosave::{FAILED_MESSAGE, SAVED_MESSAGE};
use crate::forms;
use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_bool, optional_str, page_mut, required_str};
use crate::ipc::types::{AppState, Request};
use crate::notify::NotifyKind;
use serde_json::json;
use std::time::Instant;

fn handle_form_validate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let form_id = match required_str(req, "formId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let valid = forms::validate_form(&mut page.doc, &form_id);
    ok(&req.id, json!({ "valid": valid }))
}

fn handle_marks_validate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let input_id = match required_str(req, "inputId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let check = forms::validate_marks(&mut page.doc, &input_id);
    ok(
        &req.id,
        json!({ "valid": check.valid, "message": check.message }),
    )
}

fn handle_form_autosave(state: &mut AppState, req: &Request) -> serde_json::Value {
    let form_id = match required_str(req, "formId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let endpoint = match required_str(req, "endpoint") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(form) = page.doc.by_id(&form_id) else {
        return ok(&req.id, json!({ "bound": false }));
    };
    page.bindings.register_autosave(form, &endpoint);
    ok(&req.id, json!({ "bound": true }))
}

/// A change event. Writes the new field state, then fires the auto-save for
/// the enclosing bound form, if any. One POST per change; overlapping edits
/// are not coalesced, so the last response wins.
fn handle_event_change(state: &mut AppState, req: &Request) -> serde_json::Value {
    let target_id = match required_str(req, "targetId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(target) = page.doc.by_id(&target_id) else {
        return ok(&req.id, json!({ "saved": false }));
    };
    if let Some(value) = optional_str(req, "value") {
        page.doc.set_value(target, &value);
    }
    if let Some(checked) = optional_bool(req, "checked") {
        page.doc.set_checked(target, checked);
    }

    let Some(binding) = page.bindings.autosave_for(&page.doc, target) else {
        return ok(&req.id, json!({ "saved": false }));
    };
    let form = binding.form;
    let endpoint = binding.endpoint.clone();

    let fields = forms::serialize_form(&page.doc, form);
    let token = forms::csrf_token(&page.doc);
    let outcome = state.transport.post_form(&endpoint, &fields, token.as_deref());

    let now = Instant::now();
    match outcome {
        Ok(resp) if resp.success => {
            page.notifications
                .show(&mut page.doc, SAVED_MESSAGE, NotifyKind::Success, now);
            ok(&req.id, json!({ "saved": true, "success": true }))
        }
        Ok(_) => {
            page.notifications
                .show(&mut page.doc, FAILED_MESSAGE, NotifyKind::Danger, now);
            ok(&req.id, json!({ "saved": true, "success": false }))
        }
        Err(e) => {
            log::error!("auto-save POST to {} failed: {:#}", endpoint, e);
            page.notifications
                .show(&mut page.doc, FAILED_MESSAGE, NotifyKind::Danger, now);
            ok(
                &req.id,
                json!({ "saved": true, "success": false, "transportError": true }),
            )
        }
    }
}

/// A submit attempt. Forms registered for validation gate the submit on the
/// required-field check; everything else passes through.
fn handle_event_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let form_id = match required_str(req, "formId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = match page_mut(&mut state.page, req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(form) = page.doc.by_id(&form_id) else {
        return ok(&req.id, json!({ "allowed": true, "validated": false }));
    };
    if !page.bindings.validates_on_submit(form) {
        return ok(&req.id, json!({ "allowed": true, "validated": false }));
    }
    let valid = forms::validate_form(&mut page.doc, &form_id);
    ok(&req.id, json!({ "allowed": valid, "validated": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "form.validate" => Some(handle_form_validate(state, req)),
        "marks.validate" => Some(handle_marks_validate(state, req)),
        "form.autosave" => Some(handle_form_autosave(state, req)),
        "event.change" => Some(handle_event_change(state, req)),
        "event.submit" => Some(handle_event_submit(state, req)),
        _ => None,
    }
}
