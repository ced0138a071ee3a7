use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filtered rows + per-county summary (central panel)
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;

/// Render the county summary and the filtered session rows side by side.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    ui.columns(2, |cols| {
        cols[0].strong("County submissions");
        summary_table(&mut cols[0], state);
        cols[1].strong(format!("Sessions ({})", state.view.len()));
        sessions_table(&mut cols[1], state);
    });
}

fn summary_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::remainder().at_least(110.0))
        .columns(Column::auto().at_least(50.0), 3)
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["County", "Submissions", "% Youth", "% Female youth"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.summary.len(), |mut row| {
                let s = &state.summary[row.index()];
                row.col(|ui| {
                    let text = RichText::new(&s.county);
                    ui.label(if s.in_registry { text } else { text.italics() });
                });
                row.col(|ui| {
                    ui.label(s.submissions.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}%", s.pct_youth()));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}%", s.pct_female_youth()));
                });
            });
        });
}

fn sessions_table(ui: &mut Ui, state: &AppState) {
    let records = &state.view.records;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(80.0))
        .columns(Column::auto().at_least(70.0), 3)
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Date", "County", "Officer", "Gender", "TA type"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let r = &records[row.index()];
                row.col(|ui| {
                    ui.label(r.date.format("%Y-%m-%d").to_string());
                });
                row.col(|ui| {
                    ui.label(&r.county);
                });
                row.col(|ui| {
                    ui.label(&r.officer);
                });
                row.col(|ui| {
                    ui.label(r.gender.to_string());
                });
                row.col(|ui| {
                    let mut text = RichText::new(&r.ta_type);
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(&r.ta_type));
                    }
                    ui.label(text);
                });
            });
        });
}
