use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use county_dashboard::data::registry::county_key;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submissions-per-county chart (central panel)
// ---------------------------------------------------------------------------

const UNSPECIFIED: &str = "(unspecified)";

/// Stacked bars of submissions per county, one stack segment per TA type.
/// Only counties with at least one visible submission get a bar.
pub fn coverage_chart(ui: &mut Ui, state: &AppState) {
    let counties: Vec<&str> = state
        .summary
        .iter()
        .filter(|s| s.submissions > 0)
        .map(|s| s.county.as_str())
        .collect();

    if counties.is_empty() {
        ui.label("No submissions match the current filters.");
        return;
    }

    // (county key, lowercased TA type) → count
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for r in &state.view.records {
        let ta = r.ta_type.trim().to_lowercase();
        *counts.entry((county_key(&r.county), ta)).or_default() += 1;
    }

    let mut segments: Vec<(String, Color32)> = state
        .options
        .ta_types
        .iter()
        .map(|ta| {
            let color = state
                .color_map
                .as_ref()
                .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(ta));
            (ta.clone(), color)
        })
        .collect();
    segments.push((UNSPECIFIED.to_string(), Color32::GRAY));

    let mut charts: Vec<BarChart> = Vec::new();
    for (label, color) in &segments {
        let key = if label == UNSPECIFIED {
            String::new()
        } else {
            label.to_lowercase()
        };
        let bars: Vec<Bar> = counties
            .iter()
            .enumerate()
            .map(|(i, county)| {
                let n = counts
                    .get(&(county_key(county), key.clone()))
                    .copied()
                    .unwrap_or(0);
                Bar::new(i as f64, n as f64).width(0.7).name(*county)
            })
            .collect();
        if bars.iter().all(|b| b.value == 0.0) {
            continue;
        }

        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            BarChart::new(bars).name(label).color(*color).stack_on(&below)
        };
        charts.push(chart);
    }

    let labels: Vec<String> = counties.iter().map(|c| c.to_string()).collect();
    Plot::new("coverage_chart")
        .legend(Legend::default())
        .height(260.0)
        .y_axis_label("Submissions")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
