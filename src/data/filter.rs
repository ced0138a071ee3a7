use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{Gender, SessionRecord};
use super::registry::{county_key, CountyRegistry};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Inclusive date bounds; a missing bound is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The user's current widget selections.
///
/// `None` (or an empty county set) on a dimension means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub dates: Option<DateRange>,
    /// Selected counties, compared after [`county_key`] normalization.
    pub counties: Option<BTreeSet<String>>,
    pub gender: Option<Gender>,
    /// Compared case-insensitively after trimming.
    pub ta_type: Option<String>,
}

impl FilterSelection {
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.dates = Some(DateRange::new(start, end));
        self
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.counties
            .get_or_insert_with(BTreeSet::new)
            .insert(county.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_ta_type(mut self, ta_type: impl Into<String>) -> Self {
        self.ta_type = Some(ta_type.into());
        self
    }

    /// No active constraint on any dimension.
    pub fn is_empty(&self) -> bool {
        self.dates.map_or(true, |r| r.is_unbounded())
            && self.counties.as_ref().map_or(true, |set| set.is_empty())
            && self.gender.is_none()
            && self.ta_type.is_none()
    }

    /// Whether `record` passes every active constraint.
    pub fn matches(&self, record: &SessionRecord) -> bool {
        self.compile().matches(record)
    }

    /// Pre-normalize the string constraints once per `apply`.
    fn compile(&self) -> CompiledSelection {
        CompiledSelection {
            dates: self.dates,
            counties: self
                .counties
                .as_ref()
                .filter(|set| !set.is_empty())
                .map(|set| set.iter().map(|c| county_key(c)).collect()),
            gender: self.gender,
            ta_type: self.ta_type.as_ref().map(|t| t.trim().to_lowercase()),
        }
    }
}

struct CompiledSelection {
    dates: Option<DateRange>,
    counties: Option<BTreeSet<String>>,
    gender: Option<Gender>,
    ta_type: Option<String>,
}

impl CompiledSelection {
    fn matches(&self, record: &SessionRecord) -> bool {
        if let Some(range) = &self.dates {
            if !range.contains(record.date) {
                return false;
            }
        }
        if let Some(keys) = &self.counties {
            if !keys.contains(&county_key(&record.county)) {
                return false;
            }
        }
        if let Some(gender) = self.gender {
            if record.gender != gender {
                return false;
            }
        }
        if let Some(ta) = &self.ta_type {
            if record.ta_type.trim().to_lowercase() != *ta {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Rows matching a selection plus the registry counties none of them cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    /// Matching records in source order.
    pub records: Vec<SessionRecord>,
    /// Registry counties (canonical spelling) with zero matching records.
    pub missing_counties: BTreeSet<String>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalized keys of every county present in `records`.
pub fn observed_counties(records: &[SessionRecord]) -> BTreeSet<String> {
    records.iter().map(|r| county_key(&r.county)).collect()
}

/// Filter `records` by `selection` and compute the coverage gap against `registry`.
///
/// Pure: the same inputs always give the same view. Selection values are
/// matched literally (modulo case and whitespace) and never checked against
/// the registry; the registry only feeds `missing_counties`.
pub fn apply(
    records: &[SessionRecord],
    selection: &FilterSelection,
    registry: &CountyRegistry,
) -> FilteredView {
    let compiled = selection.compile();
    let matching: Vec<SessionRecord> = records
        .iter()
        .filter(|r| compiled.matches(r))
        .cloned()
        .collect();

    let observed = observed_counties(&matching);
    let missing_counties = registry
        .entries()
        .filter(|(key, _)| !observed.contains(*key))
        .map(|(_, name)| name.to_string())
        .collect();

    FilteredView {
        records: matching,
        missing_counties,
    }
}

// ---------------------------------------------------------------------------
// Widget options
// ---------------------------------------------------------------------------

/// Distinct values present in the loaded data, used to populate the filter widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct counties (first-seen spelling per key), sorted by key.
    pub counties: Vec<String>,
    /// Distinct non-empty TA types (first-seen spelling), sorted case-insensitively.
    pub ta_types: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl FilterOptions {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let mut counties: Vec<(String, String)> = Vec::new();
        let mut ta_types: Vec<(String, String)> = Vec::new();
        for r in records {
            let key = county_key(&r.county);
            if !counties.iter().any(|(k, _)| *k == key) {
                counties.push((key, r.county.clone()));
            }
            let ta = r.ta_type.trim();
            if !ta.is_empty() {
                let key = ta.to_lowercase();
                if !ta_types.iter().any(|(k, _)| *k == key) {
                    ta_types.push((key, ta.to_string()));
                }
            }
        }
        counties.sort();
        ta_types.sort();

        FilterOptions {
            counties: counties.into_iter().map(|(_, v)| v).collect(),
            ta_types: ta_types.into_iter().map(|(_, v)| v).collect(),
            min_date: records.iter().map(|r| r.date).min(),
            max_date: records.iter().map(|r| r.date).max(),
        }
    }
}
