use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let page_index = req.params.get("pageIndex").and_then(|v| v.as_u64());
    let page_size = req.params.get("pageSize").and_then(|v| v.as_u64());
    if let (Some(page_index), Some(page_size)) = (page_index, page_size) {
        if page_size == 0 {
            return err(&req.id, "bad_params", "pageSize must be at least 1", None);
        }
        app.table
            .borrow_mut()
            .set_page(page_index as usize, page_size as usize);
    }

    let table = app.table.borrow();
    let pager = table.pager();
    ok(
        &req.id,
        json!({
            "students": table.page_rows(),
            "total": table.len(),
            "pageIndex": pager.map(|p| p.page_index),
            "pageSize": pager.map(|p| p.page_size),
        }),
    )
}

fn handle_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    app.clear();
    ok(&req.id, json!({ "students": [], "total": 0 }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.clear" => Some(handle_clear(state, req)),
        _ => None,
    }
}
