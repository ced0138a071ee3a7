use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// Gender – closed set used by the gender filter
// ---------------------------------------------------------------------------

/// Participant gender as recorded on the session form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    Male,
    Female,
    /// Anything else, including blank cells.
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Lenient parse: `male`/`m` and `female`/`f` in any case, everything else is `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionRecord – one row of the session log
// ---------------------------------------------------------------------------

/// A single mentorship session (one row of the source table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub date: NaiveDate,
    /// Trimmed county name as written in the source.
    pub county: String,
    /// Field officer who logged the session.
    pub officer: String,
    pub gender: Gender,
    /// Category of technical assistance delivered.
    pub ta_type: String,
    /// Participant age, when the source has an age column and the cell is numeric.
    pub age: Option<u32>,
    /// Uninterpreted extra columns in source column order: header → raw cell text.
    pub extra: IndexMap<String, String>,
}

impl SessionRecord {
    /// Record with only the required fields set; the rest blank.
    pub fn new(date: NaiveDate, county: impl Into<String>) -> Self {
        SessionRecord {
            date,
            county: county.into(),
            officer: String::new(),
            gender: Gender::Other,
            ta_type: String::new(),
            age: None,
            extra: IndexMap::new(),
        }
    }

    pub fn with_officer(mut self, officer: impl Into<String>) -> Self {
        self.officer = officer.into();
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_ta_type(mut self, ta_type: impl Into<String>) -> Self {
        self.ta_type = ta_type.into();
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Youth as defined by the programme: 18 to 35 inclusive.
    pub fn is_youth(&self) -> bool {
        matches!(self.age, Some(18..=35))
    }
}

// ---------------------------------------------------------------------------
// LoadReport – loader output including tolerated row failures
// ---------------------------------------------------------------------------

/// Why a source row was left out of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1-based row number in the source, header is row 1.
    pub row: usize,
    pub reason: String,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Valid records in source order.
    pub records: Vec<SessionRecord>,
    /// Data rows seen in the source (excluding the header).
    pub total_rows: usize,
    /// One entry per dropped row.
    pub warnings: Vec<RowWarning>,
}

impl LoadReport {
    pub fn dropped_rows(&self) -> usize {
        self.warnings.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
