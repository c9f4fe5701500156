use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use lift_stats::chart::format_kg;
use lift_stats::data::{DatasetSource, FilterColumn, LiftType};

use crate::state::AppState;

const COMBO_WIDTH: f32 = 160.0;

// ---------------------------------------------------------------------------
// Left side panel – lift selector and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None if state.loading => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Loading dataset…");
            });
            return;
        }
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Changes are collected while the catalog is borrowed, then applied.
    let mut new_lift: Option<LiftType> = None;
    let mut new_filter: Option<(FilterColumn, Option<String>)> = None;
    let mut clear = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Lift selector ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Lift");
                let mut lift = state.lift;
                egui::ComboBox::from_id_salt("lift")
                    .width(COMBO_WIDTH)
                    .selected_text(lift.name())
                    .show_ui(ui, |ui: &mut Ui| {
                        for candidate in LiftType::ALL {
                            ui.selectable_value(&mut lift, candidate, candidate.name());
                        }
                    });
                if lift != state.lift {
                    new_lift = Some(lift);
                }
            });
            ui.separator();

            // ---- One drop-down per catalog column ----
            for (column, values) in dataset.catalog().iter() {
                let before = state.selection.get(column).map(str::to_string);
                let mut current = before.clone();

                ui.horizontal(|ui: &mut Ui| {
                    ui.label(column.name());
                    egui::ComboBox::from_id_salt(column.name())
                        .width(COMBO_WIDTH)
                        .selected_text(current.as_deref().unwrap_or("None"))
                        .show_ui(ui, |ui: &mut Ui| {
                            ui.selectable_value(&mut current, None, RichText::new("None").italics());
                            for value in values {
                                ui.selectable_value(&mut current, Some(value.clone()), value.as_str());
                            }
                        });
                });

                if current != before {
                    new_filter = Some((column, current));
                }
            }

            if !state.selection.is_empty() && ui.small_button("Clear filters").clicked() {
                clear = true;
            }
            ui.separator();

            // ---- Summary text ----
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Mean:");
                ui.strong(format_kg(state.summary.mean));
                ui.add_space(12.0);
                ui.label("Std:");
                ui.strong(format_kg(state.summary.std_dev));
            });
            ui.label(format!("{} lifters in sample", state.summary.count));
            ui.separator();

            egui::CollapsingHeader::new("Buckets")
                .default_open(false)
                .show(ui, |ui: &mut Ui| bucket_table(ui, &*state));
        });

    if clear {
        state.clear_filters();
    }
    if let Some(lift) = new_lift {
        state.set_lift(lift);
    }
    if let Some((column, value)) = new_filter {
        state.set_filter(column, value);
    }
}

fn bucket_table(ui: &mut Ui, state: &AppState) {
    if state.summary.buckets.is_empty() {
        ui.label("No data");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Range (kg)");
            });
            header.col(|ui| {
                ui.strong("Count");
            });
            header.col(|ui| {
                ui.strong("Mean");
            });
        })
        .body(|mut body| {
            for bucket in &state.summary.buckets {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(format!("{} – {}", bucket.start, bucket.end()));
                    });
                    row.col(|ui| {
                        ui.label(bucket.count.to_string());
                    });
                    row.col(|ui| {
                        ui.label(bucket.mean.map(format_kg).unwrap_or_default());
                    });
                });
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
        });

        ui.separator();
        ui.strong("POWER LIFT STATS");

        if let Some(ds) = &state.dataset {
            ui.separator();
            ui.label(format!(
                "{} results loaded, {} {} lifters",
                ds.len(),
                ds.index().partition_len(state.lift),
                state.lift.name().to_lowercase(),
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open lift results")
        .add_filter("Supported files", &["parquet", "pq", "csv", "gz", "json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("CSV", &["csv", "gz"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(DatasetSource::File(path));
    }
}
