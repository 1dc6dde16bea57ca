use serde_json::json;
use std::path::PathBuf;

use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(out_path) = req
        .params
        .get("outPath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return err(&req.id, "bad_params", "missing outPath", None);
    };

    match backup::export_students_bundle(app.store.snapshot(), &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "studentCount": summary.student_count,
                "outPath": out_path.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "export_failed", format!("{e:?}"), None),
    }
}

fn handle_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(bundle_path) = req
        .params
        .get("bundlePath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return err(&req.id, "bad_params", "missing bundlePath", None);
    };

    match backup::import_students_bundle(&bundle_path) {
        Ok(summary) => {
            let count = summary.students.len();
            app.store.replace_all(summary.students);
            ok(
                &req.id,
                json!({
                    "bundleFormatDetected": summary.bundle_format_detected,
                    "studentCount": count,
                    "students": app.store.snapshot(),
                }),
            )
        }
        Err(e) => err(&req.id, "bundle_invalid", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_export(state, req)),
        "backup.import" => Some(handle_import(state, req)),
        _ => None,
    }
}
