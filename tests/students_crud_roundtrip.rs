
use serde_json::json;
use test_support::{create_student, request_ok, spawn_sidecar, temp_dir};

#[test]
fn created_record_round_trips_across_a_daemon_restart() {
    let workspace = temp_dir("studentd-crud-roundtrip");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "form.set",
        json!({ "field": "name", "value": "Ann" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "form.ageInput",
        json!({ "raw": "20" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "form.set",
        json!({ "field": "gender", "value": "female" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "form.set",
        json!({ "field": "course", "value": "B.Sc" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "form.toggleSubject",
        json!({ "subject": "Math", "checked": true }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "form.set",
        json!({ "field": "email", "value": "ann@example.com" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "form.set",
        json!({ "field": "dob", "value": "2004-05-17" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "form.addSkill",
        json!({ "value": "Rust" }),
    );

    let submit = request_ok(&mut stdin, &mut reader, "10", "form.submit", json!({}));
    assert_eq!(submit.get("status").and_then(|v| v.as_str()), Some("ok"));
    assert_eq!(submit.get("event").and_then(|v| v.as_str()), Some("recordAdded"));

    let expected = json!({
        "name": "Ann",
        "age": 20,
        "gender": "female",
        "course": "B.Sc",
        "subjects": ["Math"],
        "email": "ann@example.com",
        "dob": "2004-05-17",
        "skills": ["Rust"]
    });

    let list = request_ok(&mut stdin, &mut reader, "11", "students.list", json!({}));
    assert_eq!(list.get("total").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(list.pointer("/students/0"), Some(&expected));

    // The draft resets to defaults after a successful submit.
    let form = request_ok(&mut stdin, &mut reader, "12", "form.get", json!({}));
    assert_eq!(form.pointer("/draft/name"), Some(&json!("")));
    assert_eq!(form.pointer("/draft/gender"), Some(&json!("male")));
    assert_eq!(form.pointer("/draft/mode"), Some(&json!("create")));

    drop(stdin);

    // Same workspace, fresh process: the persisted list must rehydrate
    // field-for-field.
    let (_child2, mut stdin2, mut reader2) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin2,
        &mut reader2,
        "20",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let list = request_ok(&mut stdin2, &mut reader2, "21", "students.list", json!({}));
    assert_eq!(list.get("total").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(list.pointer("/students/0"), Some(&expected));
}

#[test]
fn clear_empties_the_store_durably() {
    let workspace = temp_dir("studentd-clear");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    for i in 0..3 {
        create_student(
            &mut stdin,
            &mut reader,
            &format!("c{i}"),
            &format!("student-{i}"),
            "21",
            "B.A",
        );
    }

    let cleared = request_ok(&mut stdin, &mut reader, "9", "students.clear", json!({}));
    assert_eq!(cleared.get("total").and_then(|v| v.as_u64()), Some(0));

    drop(stdin);
    let (_child2, mut stdin2, mut reader2) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin2,
        &mut reader2,
        "10",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let list = request_ok(&mut stdin2, &mut reader2, "11", "students.list", json!({}));
    assert_eq!(list.get("total").and_then(|v| v.as_u64()), Some(0));
}
