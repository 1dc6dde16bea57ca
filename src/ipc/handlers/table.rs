use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{draft_json, today};
use crate::ipc::types::{AppState, Request};

fn handle_page(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let page_index = req.params.get("pageIndex").and_then(|v| v.as_u64());
    let page_size = req.params.get("pageSize").and_then(|v| v.as_u64());
    let (Some(page_index), Some(page_size)) = (page_index, page_size) else {
        return err(&req.id, "bad_params", "missing pageIndex/pageSize", None);
    };
    if page_size == 0 {
        return err(&req.id, "bad_params", "pageSize must be at least 1", None);
    }

    let mut table = app.table.borrow_mut();
    table.set_page(page_index as usize, page_size as usize);
    ok(
        &req.id,
        json!({
            "rows": table.page_rows(),
            "total": table.len(),
            "pageIndex": page_index,
            "pageSize": page_size,
        }),
    )
}

fn handle_request_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(row) = req.params.get("row").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing row", None);
    };

    match app.request_edit(row as usize) {
        Some((student, index)) => ok(
            &req.id,
            json!({
                "student": student,
                "index": index,
                "draft": draft_json(&app.form, today()),
            }),
        ),
        None => err(&req.id, "bad_params", "row out of range", None),
    }
}

fn handle_request_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(row) = req.params.get("row").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing row", None);
    };

    match app.request_delete(row as usize) {
        Some(index) => ok(
            &req.id,
            json!({
                "index": index,
                "students": app.store.snapshot(),
                "total": app.store.len(),
            }),
        ),
        None => err(&req.id, "bad_params", "row out of range", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "table.page" => Some(handle_page(state, req)),
        "table.requestEdit" => Some(handle_request_edit(state, req)),
        "table.requestDelete" => Some(handle_request_delete(state, req)),
        _ => None,
    }
}
