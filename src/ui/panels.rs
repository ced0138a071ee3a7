use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use county_dashboard::data::model::Gender;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    if ui.button("Clear filters").clicked() {
        state.clear_filters();
    }
    ui.add_space(4.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            date_filter(ui, state);
            ui.separator();
            gender_filter(ui, state);
            ui.separator();
            ta_filter(ui, state);
            ui.separator();
            county_filter(ui, state);
        });
}

fn date_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Date");
    let before = (state.start_enabled, state.start_date, state.end_enabled, state.end_date);

    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut state.start_enabled, "From");
        ui.add_enabled_ui(state.start_enabled, |ui: &mut Ui| {
            ui.add(DatePickerButton::new(&mut state.start_date).id_salt("start_date"));
        });
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut state.end_enabled, "To");
        ui.add_enabled_ui(state.end_enabled, |ui: &mut Ui| {
            ui.add(DatePickerButton::new(&mut state.end_date).id_salt("end_date"));
        });
    });

    if before != (state.start_enabled, state.start_date, state.end_enabled, state.end_date) {
        state.refilter();
    }
}

fn gender_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Gender");
    let mut gender = state.selection.gender;
    egui::ComboBox::from_id_salt("gender")
        .selected_text(gender.map_or_else(|| "All".to_string(), |g| g.to_string()))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut gender, None, "All");
            for g in Gender::ALL {
                ui.selectable_value(&mut gender, Some(g), g.to_string());
            }
        });
    if gender != state.selection.gender {
        state.set_gender(gender);
    }
}

fn ta_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Technical assistance");
    let mut ta = state.selection.ta_type.clone();
    egui::ComboBox::from_id_salt("ta_type")
        .selected_text(ta.clone().unwrap_or_else(|| "All".to_string()))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut ta, None, "All");
            for option in &state.options.ta_types {
                let mut text = RichText::new(option);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(option));
                }
                ui.selectable_value(&mut ta, Some(option.clone()), text);
            }
        });
    if ta != state.selection.ta_type {
        state.set_ta_type(ta);
    }
}

fn county_filter(ui: &mut Ui, state: &mut AppState) {
    let counties = state.options.counties.clone();
    let n_selected = counties.iter().filter(|c| state.county_selected(c)).count();
    let header_text = format!("County  ({n_selected}/{})", counties.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("county_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_counties();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_counties();
                }
            });

            for county in &counties {
                let mut checked = state.county_selected(county);
                let known = state.registry.contains(county);
                let mut text = RichText::new(county);
                if !known {
                    text = text.italics().color(Color32::GOLD);
                }
                let mut response = ui.checkbox(&mut checked, text);
                if !known {
                    response = response.on_hover_text("Not in the county registry");
                }
                if response.changed() {
                    state.toggle_county(county);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            if let Some(name) = state.source.as_ref().and_then(|p| p.file_name()) {
                ui.label(RichText::new(name.to_string_lossy()).strong());
            }
            ui.label(format!("{} sessions loaded, {} visible", ds.len(), state.view.len()));
            let dropped = state.dropped_rows();
            if dropped > 0 {
                ui.separator();
                ui.label(
                    RichText::new(format!("{dropped} rows skipped (invalid date or county)"))
                        .color(Color32::GOLD),
                )
                .on_hover_text(
                    ds.warnings
                        .iter()
                        .take(20)
                        .map(|w| w.to_string())
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Coverage alert
// ---------------------------------------------------------------------------

/// List of registry counties with no submissions under the current filter.
pub fn coverage_alert(ui: &mut Ui, state: &AppState) {
    let missing = &state.view.missing_counties;
    if missing.is_empty() {
        ui.label(RichText::new("Every county has at least one submission.").color(Color32::GREEN));
        return;
    }

    let mut names: Vec<&str> = missing.iter().map(String::as_str).collect();
    names.sort_by_key(|n| n.to_lowercase());

    egui::CollapsingHeader::new(
        RichText::new(format!(
            "{} of {} counties with no submissions",
            names.len(),
            state.registry.len()
        ))
        .color(Color32::from_rgb(230, 120, 60))
        .strong(),
    )
    .id_salt("missing_counties")
    .default_open(true)
    .show(ui, |ui: &mut Ui| {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for name in names {
                ui.label(RichText::new(name).monospace());
            }
        });
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open session log")
        .add_filter("Supported files", &["csv", "xlsx", "xls", "ods", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_sessions.csv")
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(()) => {
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
