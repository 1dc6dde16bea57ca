use serde::{Deserialize, Serialize};

/// Canonical student record as persisted under `students_v1` and shipped
/// over IPC. Optional fields are omitted when absent; `dob` stays an ISO
/// `YYYY-MM-DD` string at rest and is parsed into a date only while a form
/// draft holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub course: Course,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "B.Sc")]
    BSc,
    #[serde(rename = "B.A")]
    BA,
    #[serde(rename = "B.Com")]
    BCom,
    #[serde(rename = "B.Tech")]
    BTech,
    #[serde(rename = "M.Sc")]
    MSc,
    #[serde(rename = "M.Tech")]
    MTech,
}

impl Course {
    pub const ALL: [Course; 6] = [
        Course::BSc,
        Course::BA,
        Course::BCom,
        Course::BTech,
        Course::MSc,
        Course::MTech,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::BSc => "B.Sc",
            Self::BA => "B.A",
            Self::BCom => "B.Com",
            Self::BTech => "B.Tech",
            Self::MSc => "M.Sc",
            Self::MTech => "M.Tech",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Math,
    Physics,
    Chemistry,
    Biology,
    History,
    Geography,
    Computer,
}

impl Subject {
    pub const ALL: [Subject; 7] = [
        Subject::Math,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::History,
        Subject::Geography,
        Subject::Computer,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Math => "Math",
            Self::Physics => "Physics",
            Self::Chemistry => "Chemistry",
            Self::Biology => "Biology",
            Self::History => "History",
            Self::Geography => "Geography",
            Self::Computer => "Computer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == s)
    }
}

/// Permissive syntactic check: exactly one `@`, non-empty local and domain
/// parts, no whitespace. A dot in the domain is not required (matches the
/// tolerance of the form validator this replaces).
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}
