use chrono::NaiveDate;
use serde_json::json;

use crate::form::{FormEvent, ISO_DATE_FMT};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{draft_json, skills_json, today};
use crate::ipc::types::{AppState, Request};
use crate::model::{Course, Gender, Subject};

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    ok(&req.id, json!({ "draft": draft_json(&app.form, today()) }))
}

fn handle_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(field) = req.params.get("field").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing field", None);
    };
    let value = req.params.get("value").cloned().unwrap_or(json!(null));

    match field {
        "name" => {
            let Some(name) = value.as_str() else {
                return err(&req.id, "bad_params", "name must be a string", None);
            };
            app.form.set_name(name);
        }
        "gender" => {
            let gender = value.as_str().and_then(Gender::parse);
            let Some(gender) = gender else {
                return err(&req.id, "bad_params", "unknown gender", None);
            };
            app.form.set_gender(gender);
        }
        "course" => {
            if value.is_null() {
                app.form.set_course(None);
            } else {
                let course = value.as_str().and_then(Course::parse);
                let Some(course) = course else {
                    return err(&req.id, "bad_params", "unknown course code", None);
                };
                app.form.set_course(Some(course));
            }
        }
        "email" => {
            let Some(email) = value.as_str() else {
                return err(&req.id, "bad_params", "email must be a string", None);
            };
            app.form.set_email(email);
        }
        "dob" => {
            if value.is_null() {
                app.form.set_dob(None);
            } else {
                let dob = value
                    .as_str()
                    .and_then(|s| NaiveDate::parse_from_str(s, ISO_DATE_FMT).ok());
                let Some(dob) = dob else {
                    return err(&req.id, "bad_params", "dob must be YYYY-MM-DD or null", None);
                };
                app.form.set_dob(Some(dob));
            }
        }
        other => {
            return err(
                &req.id,
                "bad_params",
                format!("unknown form field: {other}"),
                None,
            )
        }
    }

    ok(&req.id, json!({ "draft": draft_json(&app.form, today()) }))
}

fn handle_age_input(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(raw) = req.params.get("raw").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing raw", None);
    };
    app.form.set_age_input(raw);
    ok(&req.id, json!({ "age": app.form.age() }))
}

fn handle_toggle_subject(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let subject = req
        .params
        .get("subject")
        .and_then(|v| v.as_str())
        .and_then(Subject::parse);
    let Some(subject) = subject else {
        return err(&req.id, "bad_params", "unknown subject", None);
    };
    let checked = req
        .params
        .get("checked")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    app.form.toggle_subject(subject, checked);
    ok(&req.id, json!({ "subjects": app.form.subjects() }))
}

fn handle_add_skill(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(value) = req.params.get("value").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing value", None);
    };
    let added = app.form.add_skill(value);
    ok(
        &req.id,
        json!({ "added": added, "skills": skills_json(&app.form) }),
    )
}

fn handle_remove_skill(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(value) = req.params.get("value").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing value", None);
    };
    app.form.remove_skill(value);
    ok(&req.id, json!({ "skills": skills_json(&app.form) }))
}

fn handle_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    // Validation failure is data for the caller, not a protocol error.
    match app.submit_form(today()) {
        Ok(FormEvent::RecordAdded(_)) => ok(
            &req.id,
            json!({
                "status": "ok",
                "event": "recordAdded",
                "students": app.store.snapshot(),
                "total": app.store.len(),
            }),
        ),
        Ok(FormEvent::RecordUpdated(_, index)) => ok(
            &req.id,
            json!({
                "status": "ok",
                "event": "recordUpdated",
                "index": index,
                "students": app.store.snapshot(),
                "total": app.store.len(),
            }),
        ),
        Err(errors) => ok(&req.id, json!({ "status": "invalid", "errors": errors })),
    }
}

fn handle_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(app) = state.app.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    app.form.load_draft(None);
    ok(&req.id, json!({ "draft": draft_json(&app.form, today()) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "form.get" => Some(handle_get(state, req)),
        "form.set" => Some(handle_set(state, req)),
        "form.ageInput" => Some(handle_age_input(state, req)),
        "form.toggleSubject" => Some(handle_toggle_subject(state, req)),
        "form.addSkill" => Some(handle_add_skill(state, req)),
        "form.removeSkill" => Some(handle_remove_skill(state, req)),
        "form.submit" => Some(handle_submit(state, req)),
        "form.reset" => Some(handle_reset(state, req)),
        _ => None,
    }
}
