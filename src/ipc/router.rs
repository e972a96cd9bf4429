use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;
use std::time::Instant;

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    log::debug!("request id={} method={}", req.id, req.method);
    if let Some(page) = state.page.as_mut() {
        page.settle_due(Instant::now());
    }

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::ui::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::selection::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::forms::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::percentage::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::table::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::notify::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::keys::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
