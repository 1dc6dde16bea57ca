use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{is_valid_email, Course, Gender, StudentRecord, Subject};

pub const MAX_NAME_CHARS: usize = 250;
pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 100;
pub const MAX_SKILL_CHARS: usize = 50;
pub const MAX_SKILLS: usize = 25;
pub const MAX_TOTAL_SKILL_CHARS: usize = 500;

pub const ISO_DATE_FMT: &str = "%Y-%m-%d";

/// Create vs. edit is an explicit mode, not a nullable index, so "no
/// target" can never be confused with "target index 0".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    EditAt(usize),
}

impl Default for DraftMode {
    fn default() -> Self {
        DraftMode::Create
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    RecordAdded(StudentRecord),
    RecordUpdated(StudentRecord, usize),
}

/// Field name -> user-facing message, ordered for stable output.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Ordered skill collection with three stacked limits (per-item length,
/// count, cumulative length) and the current limit-violation message.
/// Keeping the checks on the value type keeps them testable away from any
/// form wiring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillList {
    items: Vec<String>,
    error: Option<String>,
}

impl SkillList {
    pub fn from_items(items: Vec<String>) -> Self {
        Self { items, error: None }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn total_chars(&self) -> usize {
        self.items.iter().map(|s| s.chars().count()).sum()
    }

    /// Trims and appends. Empty-after-trim is a silent no-op. The limit
    /// checks apply in precedence order; a rejected add records its message
    /// and leaves the sequence unchanged, a successful add clears any prior
    /// message.
    pub fn try_append(&mut self, raw: &str) -> bool {
        let value = raw.trim();
        if value.is_empty() {
            return false;
        }
        let len = value.chars().count();
        if len > MAX_SKILL_CHARS {
            self.error = Some("Each skill cannot exceed 50 characters".to_string());
            return false;
        }
        if self.items.len() >= MAX_SKILLS {
            self.error = Some("Maximum 25 skills allowed".to_string());
            return false;
        }
        if self.total_chars() + len > MAX_TOTAL_SKILL_CHARS {
            self.error = Some("Total skills length cannot exceed 500 characters".to_string());
            return false;
        }
        self.error = None;
        self.items.push(value.to_string());
        true
    }

    /// Removes every occurrence equal to `value`. Always permitted and
    /// always clears the message, even when `value` is not present.
    pub fn remove(&mut self, value: &str) {
        self.items.retain(|s| s != value);
        self.error = None;
    }
}

/// Private working copy of one record's fields. Nothing here touches the
/// store; the draft only leaves as a `FormEvent` from a valid `submit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentForm {
    mode: DraftMode,
    name: String,
    age: Option<u32>,
    gender: Gender,
    course: Option<Course>,
    subjects: Vec<Subject>,
    email: String,
    dob: Option<NaiveDate>,
    skills: SkillList,
    touched: bool,
}

impl StudentForm {
    pub fn mode(&self) -> DraftMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn course(&self) -> Option<Course> {
        self.course
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn dob(&self) -> Option<NaiveDate> {
        self.dob
    }

    pub fn skills(&self) -> &SkillList {
        &self.skills
    }

    /// True once a submit has failed; signals that per-field messages
    /// should be surfaced.
    pub fn touched(&self) -> bool {
        self.touched
    }

    /// Copies a record into the draft for editing, or resets to defaults
    /// (gender male, collections empty, everything else unset).
    pub fn load_draft(&mut self, target: Option<(&StudentRecord, usize)>) {
        match target {
            Some((record, index)) => {
                self.name = record.name.clone();
                self.age = Some(record.age);
                self.gender = record.gender;
                self.course = Some(record.course);
                self.subjects = record.subjects.clone();
                self.email = record.email.clone().unwrap_or_default();
                self.dob = record
                    .dob
                    .as_deref()
                    .and_then(|s| NaiveDate::parse_from_str(s, ISO_DATE_FMT).ok());
                self.skills = SkillList::from_items(record.skills.clone());
                self.mode = DraftMode::EditAt(index);
                self.touched = false;
            }
            None => *self = StudentForm::default(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    pub fn set_course(&mut self, course: Option<Course>) {
        self.course = course;
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = email.to_string();
    }

    pub fn set_dob(&mut self, dob: Option<NaiveDate>) {
        self.dob = dob;
    }

    /// Raw age input: empty clears the field, a non-integer is ignored,
    /// out-of-range values clamp to the 1..=100 the validator enforces.
    pub fn set_age_input(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() {
            self.age = None;
            return;
        }
        let Ok(value) = raw.parse::<i64>() else {
            return;
        };
        self.age = Some(value.clamp(MIN_AGE as i64, MAX_AGE as i64) as u32);
    }

    /// Set semantics over the subject catalog: checking never duplicates,
    /// unchecking removes the occurrence.
    pub fn toggle_subject(&mut self, subject: Subject, checked: bool) {
        if checked {
            if !self.subjects.contains(&subject) {
                self.subjects.push(subject);
            }
        } else if let Some(pos) = self.subjects.iter().position(|s| *s == subject) {
            self.subjects.remove(pos);
        }
    }

    /// Keeps an edit draft pointed at the same record after a removal
    /// shifted the list. Removing the edit target itself resets the draft;
    /// removing a lower index slides the target down by one.
    pub fn record_removed(&mut self, removed: usize) {
        match self.mode {
            DraftMode::EditAt(index) if index == removed => self.load_draft(None),
            DraftMode::EditAt(index) if index > removed => {
                self.mode = DraftMode::EditAt(index - 1);
            }
            _ => {}
        }
    }

    pub fn add_skill(&mut self, raw: &str) -> bool {
        self.skills.try_append(raw)
    }

    pub fn remove_skill(&mut self, value: &str) {
        self.skills.remove(value);
    }

    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Name is required".to_string());
        } else if name.chars().count() > MAX_NAME_CHARS {
            errors.insert("name", "Name cannot exceed 250 characters".to_string());
        }

        match self.age {
            None => {
                errors.insert("age", "Age is required".to_string());
            }
            Some(age) if !(MIN_AGE..=MAX_AGE).contains(&age) => {
                errors.insert("age", "Age must be between 1 and 100".to_string());
            }
            Some(_) => {}
        }

        if self.course.is_none() {
            errors.insert("course", "Course is required".to_string());
        }

        let email = self.email.trim();
        if !email.is_empty() && !is_valid_email(email) {
            errors.insert("email", "Enter a valid email address".to_string());
        }

        if let Some(dob) = self.dob {
            if dob > today {
                errors.insert("dob", "Date of birth cannot be in the future".to_string());
            }
        }

        if self
            .skills
            .items()
            .iter()
            .any(|s| s.chars().count() > MAX_SKILL_CHARS)
        {
            errors.insert("skills", "Each skill cannot exceed 50 characters".to_string());
        } else if self.skills.count() > MAX_SKILLS {
            errors.insert("skills", "Maximum 25 skills allowed".to_string());
        } else if self.skills.total_chars() > MAX_TOTAL_SKILL_CHARS {
            errors.insert(
                "skills",
                "Total skills length cannot exceed 500 characters".to_string(),
            );
        }

        errors
    }

    /// Validates every field constraint. Any failure marks the draft as
    /// touched and emits nothing; the draft itself is left as typed. A valid
    /// draft becomes exactly one event (add in Create mode, update-at-index
    /// in EditAt mode) and the draft resets to defaults.
    pub fn submit(&mut self, today: NaiveDate) -> Result<FormEvent, FieldErrors> {
        let errors = self.validate(today);
        if !errors.is_empty() {
            self.touched = true;
            return Err(errors);
        }
        let (Some(age), Some(course)) = (self.age, self.course) else {
            // Validation guarantees both; keep the failure path total anyway.
            self.touched = true;
            return Err(errors);
        };

        let email = self.email.trim();
        let record = StudentRecord {
            name: self.name.trim().to_string(),
            age,
            gender: self.gender,
            course,
            subjects: self.subjects.clone(),
            email: (!email.is_empty()).then(|| email.to_string()),
            dob: self.dob.map(|d| d.format(ISO_DATE_FMT).to_string()),
            skills: self.skills.items().to_vec(),
        };

        let event = match self.mode {
            DraftMode::Create => FormEvent::RecordAdded(record),
            DraftMode::EditAt(index) => FormEvent::RecordUpdated(record, index),
        };
        self.load_draft(None);
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).expect("date")
    }

    fn valid_form() -> StudentForm {
        let mut form = StudentForm::default();
        form.set_name("Ann");
        form.set_age_input("20");
        form.set_gender(Gender::Female);
        form.set_course(Some(Course::BSc));
        form.toggle_subject(Subject::Math, true);
        form
    }

    #[test]
    fn skill_of_exactly_50_chars_is_accepted_51_rejected() {
        let mut skills = SkillList::default();
        assert!(skills.try_append(&"x".repeat(50)));
        assert_eq!(skills.error(), None);

        assert!(!skills.try_append(&"y".repeat(51)));
        assert_eq!(skills.error(), Some("Each skill cannot exceed 50 characters"));
        assert_eq!(skills.count(), 1);
    }

    #[test]
    fn twenty_sixth_skill_is_rejected() {
        let mut skills = SkillList::default();
        for i in 0..25 {
            assert!(skills.try_append(&format!("s{i}")));
        }
        assert!(!skills.try_append("one more"));
        assert_eq!(skills.error(), Some("Maximum 25 skills allowed"));
        assert_eq!(skills.count(), 25);
    }

    #[test]
    fn cumulative_length_cap_applies_after_the_other_checks() {
        let mut skills = SkillList::default();
        for _ in 0..10 {
            assert!(skills.try_append(&"x".repeat(50)));
        }
        assert_eq!(skills.total_chars(), 500);
        assert!(!skills.try_append("z"));
        assert_eq!(
            skills.error(),
            Some("Total skills length cannot exceed 500 characters")
        );
    }

    #[test]
    fn successful_append_clears_prior_error_and_trims() {
        let mut skills = SkillList::default();
        assert!(!skills.try_append(&"y".repeat(51)));
        assert!(skills.error().is_some());
        assert!(skills.try_append("  Rust  "));
        assert_eq!(skills.items(), ["Rust"]);
        assert_eq!(skills.error(), None);
    }

    #[test]
    fn empty_after_trim_is_a_no_op() {
        let mut skills = SkillList::default();
        assert!(!skills.try_append("   "));
        assert_eq!(skills.count(), 0);
        assert_eq!(skills.error(), None);
    }

    #[test]
    fn removing_absent_skill_is_idempotent_and_clears_error() {
        let mut skills = SkillList::default();
        skills.try_append("Rust");
        skills.try_append(&"y".repeat(51));
        assert!(skills.error().is_some());

        skills.remove("not there");
        assert_eq!(skills.items(), ["Rust"]);
        assert_eq!(skills.error(), None);
    }

    #[test]
    fn age_input_clamps_and_ignores_garbage() {
        let mut form = StudentForm::default();
        form.set_age_input("250");
        assert_eq!(form.age(), Some(100));
        form.set_age_input("0");
        assert_eq!(form.age(), Some(1));
        form.set_age_input("-3");
        assert_eq!(form.age(), Some(1));
        form.set_age_input("abc");
        assert_eq!(form.age(), Some(1));
        form.set_age_input("42");
        assert_eq!(form.age(), Some(42));
        form.set_age_input("");
        assert_eq!(form.age(), None);
    }

    #[test]
    fn toggling_a_subject_twice_does_not_duplicate() {
        let mut form = StudentForm::default();
        form.toggle_subject(Subject::Math, true);
        form.toggle_subject(Subject::Math, true);
        assert_eq!(form.subjects(), [Subject::Math]);
        form.toggle_subject(Subject::Math, false);
        assert!(form.subjects().is_empty());
        form.toggle_subject(Subject::Math, false);
        assert!(form.subjects().is_empty());
    }

    #[test]
    fn valid_submit_emits_once_and_resets_to_defaults() {
        let mut form = valid_form();
        let event = form.submit(today()).expect("valid draft");
        let FormEvent::RecordAdded(record) = event else {
            panic!("expected a create event");
        };
        assert_eq!(record.name, "Ann");
        assert_eq!(record.age, 20);
        assert_eq!(record.subjects, [Subject::Math]);
        assert_eq!(record.email, None);

        assert_eq!(form, StudentForm::default());
        assert_eq!(form.gender(), Gender::Male);
        assert_eq!(form.mode(), DraftMode::Create);
    }

    #[test]
    fn invalid_submit_emits_nothing_and_leaves_draft_unchanged() {
        let mut form = valid_form();
        form.set_name("");
        let before = form.clone();

        let errors = form.submit(today()).expect_err("name missing");
        assert_eq!(errors.get("name").map(String::as_str), Some("Name is required"));
        assert!(form.touched());

        let mut expected = before;
        assert_eq!(form.name(), expected.name());
        assert_eq!(form.age(), expected.age());
        assert_eq!(form.subjects(), expected.subjects());
        assert_eq!(form.skills(), expected.skills());
        // Only the touched flag may change on a failed submit.
        expected.touched = true;
        assert_eq!(form, expected);
    }

    #[test]
    fn future_dob_is_rejected_today_is_not() {
        let mut form = valid_form();
        form.set_dob(today().succ_opt());
        let errors = form.submit(today()).expect_err("future dob");
        assert!(errors.contains_key("dob"));

        form.set_dob(Some(today()));
        assert!(form.submit(today()).is_ok());
    }

    #[test]
    fn submitted_name_is_stored_trimmed() {
        let mut form = valid_form();
        // 250 significant chars plus padding must validate and persist
        // without the padding.
        let long = "n".repeat(250);
        form.set_name(&format!("  {long}  "));
        let event = form.submit(today()).expect("valid draft");
        let FormEvent::RecordAdded(record) = event else {
            panic!("expected a create event");
        };
        assert_eq!(record.name, long);
    }

    #[test]
    fn name_over_250_chars_is_rejected() {
        let mut form = valid_form();
        form.set_name(&"n".repeat(251));
        let errors = form.submit(today()).expect_err("name too long");
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn bad_email_is_rejected_absent_email_is_fine() {
        let mut form = valid_form();
        form.set_email("not-an-email");
        let errors = form.submit(today()).expect_err("bad email");
        assert!(errors.contains_key("email"));

        form.set_email("");
        assert!(form.submit(today()).is_ok());
    }

    #[test]
    fn edit_mode_emits_update_at_the_loaded_index() {
        let record = StudentRecord {
            name: "Bo".into(),
            age: 31,
            gender: Gender::Male,
            course: Course::MTech,
            subjects: vec![Subject::Physics],
            email: Some("bo@example.com".into()),
            dob: Some("1995-01-15".into()),
            skills: vec!["C".into()],
        };
        let mut form = StudentForm::default();
        form.load_draft(Some((&record, 7)));
        assert_eq!(form.mode(), DraftMode::EditAt(7));
        assert_eq!(form.dob(), NaiveDate::from_ymd_opt(1995, 1, 15));

        form.set_name("Bo Jr");
        let event = form.submit(today()).expect("valid draft");
        let FormEvent::RecordUpdated(updated, index) = event else {
            panic!("expected an update event");
        };
        assert_eq!(index, 7);
        assert_eq!(updated.name, "Bo Jr");
        assert_eq!(updated.skills, ["C"]);
        assert_eq!(form.mode(), DraftMode::Create);
    }

    #[test]
    fn loading_a_record_with_empty_collections_clears_previous_draft() {
        let mut form = StudentForm::default();
        form.toggle_subject(Subject::History, true);
        form.add_skill("Rust");

        let bare = StudentRecord {
            name: "Cy".into(),
            age: 20,
            gender: Gender::Other,
            course: Course::BA,
            subjects: Vec::new(),
            email: None,
            dob: None,
            skills: Vec::new(),
        };
        form.load_draft(Some((&bare, 0)));
        assert!(form.subjects().is_empty());
        assert_eq!(form.skills().count(), 0);
    }
}
