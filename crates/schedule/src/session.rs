use serde::{Deserialize, Serialize};

/// One class session in the weekly timetable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassSession {
    /// Display title, `"{subject} - {class}"`.
    pub title: String,
    /// The day this session takes place, `YYYY-MM-DD`.
    pub date: String,
    /// The time slot, e.g. `07:30-08:15`.
    pub time: String,
    /// The assigned teacher.
    pub teacher: String,
    /// The class attending the session.
    pub class: String,
    /// The subject taught.
    pub subject: String,
}
