use std::collections::BTreeMap;

use super::model::{Gender, SessionRecord};
use super::registry::{county_key, CountyRegistry};

// ---------------------------------------------------------------------------
// Per-county aggregates
// ---------------------------------------------------------------------------

/// Submission counts for one county.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountySummary {
    pub county: String,
    /// `false` for counties seen in the data but unknown to the registry.
    pub in_registry: bool,
    pub submissions: usize,
    pub female: usize,
    pub male: usize,
    /// Participants aged 18 to 35.
    pub youth: usize,
    pub female_youth: usize,
}

impl CountySummary {
    fn empty(county: &str, in_registry: bool) -> Self {
        CountySummary {
            county: county.to_string(),
            in_registry,
            ..Default::default()
        }
    }

    fn add(&mut self, record: &SessionRecord) {
        self.submissions += 1;
        match record.gender {
            Gender::Female => self.female += 1,
            Gender::Male => self.male += 1,
            Gender::Other => {}
        }
        if record.is_youth() {
            self.youth += 1;
            if record.gender == Gender::Female {
                self.female_youth += 1;
            }
        }
    }

    pub fn pct_youth(&self) -> f64 {
        percent(self.youth, self.submissions)
    }

    pub fn pct_female_youth(&self) -> f64 {
        percent(self.female_youth, self.submissions)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// One row per registry county (zero-filled) plus any unregistered county
/// present in `records`, busiest first, ties by name.
pub fn county_summary(records: &[SessionRecord], registry: &CountyRegistry) -> Vec<CountySummary> {
    let mut by_key: BTreeMap<String, CountySummary> = registry
        .entries()
        .map(|(key, name)| (key.to_string(), CountySummary::empty(name, true)))
        .collect();

    for record in records {
        by_key
            .entry(county_key(&record.county))
            .or_insert_with(|| CountySummary::empty(record.county.trim(), false))
            .add(record);
    }

    let mut rows: Vec<CountySummary> = by_key.into_values().collect();
    rows.sort_by(|a, b| {
        b.submissions
            .cmp(&a.submissions)
            .then_with(|| a.county.to_lowercase().cmp(&b.county.to_lowercase()))
    });
    rows
}
