use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use county_dashboard::data::export::export_csv;
use county_dashboard::data::filter::{
    apply, DateRange, FilterOptions, FilterSelection, FilteredView,
};
use county_dashboard::data::loader::load_file;
use county_dashboard::data::model::{Gender, LoadReport};
use county_dashboard::data::registry::CountyRegistry;
use county_dashboard::data::summary::{county_summary, CountySummary};
use county_dashboard::error::LoadError;

use crate::color::ColorMap;

/// An empty county set means "no constraint", so nothing-ticked is a set
/// holding only this key. The loader never yields a blank county.
const NO_COUNTY: &str = "";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Counties the programme reports against. Read-only after start-up.
    pub registry: CountyRegistry,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<LoadReport>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Distinct values offered by the filter widgets.
    pub options: FilterOptions,

    /// Current widget selections.
    pub selection: FilterSelection,

    /// Result of the last `apply` (recomputed on every change).
    pub view: FilteredView,

    /// Per-county counts over `view.records`.
    pub summary: Vec<CountySummary>,

    /// TA category colours.
    pub color_map: Option<ColorMap>,

    /// Date picker scratch values; only applied while the matching toggle is on.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_enabled: bool,
    pub end_enabled: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(registry: CountyRegistry) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            registry,
            dataset: None,
            source: None,
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            view: FilteredView::default(),
            summary: Vec::new(),
            color_map: None,
            start_date: today,
            end_date: today,
            start_enabled: false,
            end_enabled: false,
            status_message: None,
        }
    }

    /// Load `path`, replacing the current dataset on success.
    ///
    /// A failed load clears the dashboard rather than leaving stale rows up.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(report) => {
                log::info!(
                    "Loaded {} of {} rows from {}",
                    report.len(),
                    report.total_rows,
                    path.display()
                );
                self.set_dataset(report, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.clear_dataset();
                self.status_message = Some(match e {
                    LoadError::MissingColumn(col) => {
                        format!("Cannot display dashboard: required column '{col}' missing")
                    }
                    other => format!("Error: {other}"),
                });
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, report: LoadReport, source: Option<PathBuf>) {
        self.options = FilterOptions::from_records(&report.records);
        self.color_map = Some(ColorMap::new(&self.options.ta_types));
        self.selection = FilterSelection::default();
        self.start_enabled = false;
        self.end_enabled = false;
        if let (Some(min), Some(max)) = (self.options.min_date, self.options.max_date) {
            self.start_date = min;
            self.end_date = max;
        }

        self.status_message = None;
        self.dataset = Some(report);
        self.source = source;
        self.refilter();
    }

    fn clear_dataset(&mut self) {
        self.dataset = None;
        self.source = None;
        self.options = FilterOptions::default();
        self.selection = FilterSelection::default();
        self.view = FilteredView::default();
        self.summary.clear();
        self.color_map = None;
    }

    /// Rows the loader skipped, for the warning label.
    pub fn dropped_rows(&self) -> usize {
        self.dataset.as_ref().map_or(0, LoadReport::dropped_rows)
    }

    /// Recompute the view after any selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.selection.dates = if self.start_enabled || self.end_enabled {
            Some(DateRange::new(
                self.start_enabled.then_some(self.start_date),
                self.end_enabled.then_some(self.end_date),
            ))
        } else {
            None
        };
        self.view = apply(&ds.records, &self.selection, &self.registry);
        self.summary = county_summary(&self.view.records, &self.registry);
        log::debug!(
            "Filter matched {} of {} rows, {} counties without submissions",
            self.view.len(),
            ds.len(),
            self.view.missing_counties.len()
        );
    }

    /// Whether `county` is ticked in the county filter. No constraint ticks everything.
    pub fn county_selected(&self, county: &str) -> bool {
        self.selection
            .counties
            .as_ref()
            .map_or(true, |set| set.contains(county))
    }

    /// Toggle a single county in the filter.
    pub fn toggle_county(&mut self, county: &str) {
        let all = &self.options.counties;
        let selected = self
            .selection
            .counties
            .get_or_insert_with(|| all.iter().cloned().collect());
        selected.remove(NO_COUNTY);
        if !selected.remove(county) {
            selected.insert(county.to_string());
        }

        if selected.is_empty() {
            selected.insert(NO_COUNTY.to_string());
        } else if selected.len() == all.len() {
            // Everything ticked again is the same as no constraint.
            self.selection.counties = None;
        }
        self.refilter();
    }

    /// Select all counties (no county constraint).
    pub fn select_all_counties(&mut self) {
        self.selection.counties = None;
        self.refilter();
    }

    /// Untick every county, which matches nothing.
    pub fn select_no_counties(&mut self) {
        self.selection.counties = Some(BTreeSet::from([NO_COUNTY.to_string()]));
        self.refilter();
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.selection.gender = gender;
        self.refilter();
    }

    pub fn set_ta_type(&mut self, ta_type: Option<String>) {
        self.selection.ta_type = ta_type;
        self.refilter();
    }

    /// Drop every constraint.
    pub fn clear_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.start_enabled = false;
        self.end_enabled = false;
        self.refilter();
    }

    /// Write the currently visible rows to `path` as CSV.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        export_csv(path, &self.view.records)
            .with_context(|| format!("writing {}", path.display()))
    }
}
