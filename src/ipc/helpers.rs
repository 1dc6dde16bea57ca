use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::form::{DraftMode, StudentForm, ISO_DATE_FMT};
use crate::model::{Course, Gender, Subject};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn draft_json(form: &StudentForm, today: NaiveDate) -> Value {
    let mode = match form.mode() {
        DraftMode::Create => json!("create"),
        DraftMode::EditAt(index) => json!({ "editAt": index }),
    };
    let errors = if form.touched() {
        json!(form.validate(today))
    } else {
        json!(null)
    };
    json!({
        "mode": mode,
        "name": form.name(),
        "age": form.age(),
        "gender": form.gender(),
        "course": form.course(),
        "subjects": form.subjects(),
        "email": form.email(),
        "dob": form.dob().map(|d| d.format(ISO_DATE_FMT).to_string()),
        "skills": skills_json(form),
        "errors": errors,
    })
}

pub fn skills_json(form: &StudentForm) -> Value {
    let skills = form.skills();
    json!({
        "items": skills.items(),
        "error": skills.error(),
        "count": skills.count(),
        "chars": skills.total_chars(),
    })
}

pub fn catalogs_json() -> Value {
    let genders: Vec<_> = [Gender::Male, Gender::Female, Gender::Other]
        .iter()
        .map(|g| g.code())
        .collect();
    json!({
        "genders": genders,
        "courses": Course::ALL.iter().map(|c| c.code()).collect::<Vec<_>>(),
        "subjectOptions": Subject::ALL.iter().map(|s| s.code()).collect::<Vec<_>>(),
    })
}
