use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(criteria) = state.criteria.clone() else {
        ui.label("Dataset has no listings to filter.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let fuels = dataset.fuels().to_vec();
    let bounds = dataset.price_bounds();
    let report = dataset.report().clone();
    let total = dataset.len();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Fuel selector ----
            ui.strong("Fuel type");
            egui::ComboBox::from_id_salt("fuel")
                .selected_text(fuel_label(criteria.fuel()))
                .show_ui(ui, |ui: &mut Ui| {
                    for fuel in &fuels {
                        let mut text = RichText::new(fuel_label(fuel));
                        if let Some(cm) = &state.fuel_colors {
                            text = text.color(cm.color_for(fuel));
                        }
                        if ui.selectable_label(criteria.fuel() == fuel, text).clicked() {
                            state.set_fuel(fuel);
                        }
                    }
                });
            ui.separator();

            // ---- Price range ----
            if let Some(bounds) = bounds {
                ui.strong("Price range");
                let mut min = criteria.min_price();
                let mut max = criteria.max_price();
                let min_changed = ui
                    .add(egui::Slider::new(&mut min, bounds.min..=bounds.max).text("min"))
                    .changed();
                let max_changed = ui
                    .add(egui::Slider::new(&mut max, bounds.min..=bounds.max).text("max"))
                    .changed();
                if min_changed || max_changed {
                    state.set_price_range(min, max);
                }
                if ui.small_button("Reset range").clicked() {
                    state.set_price_range(bounds.min, bounds.max);
                }
                ui.separator();
            }

            // ---- Raw data toggle ----
            ui.checkbox(&mut state.show_raw, "Show raw data");
            ui.separator();

            // ---- Download ----
            let visible = state.visible_rows();
            let download = ui.add_enabled(
                visible > 0,
                egui::Button::new(format!("Download filtered CSV ({visible} rows)")),
            );
            if download.clicked() {
                save_file_dialog(state);
            }
            ui.separator();

            // ---- Cleaning summary ----
            ui.label(format!("{total} listings after cleaning"));
            if report.excluded() > 0 {
                ui.label(
                    RichText::new(format!(
                        "{} of {} rows dropped: non-numeric price or model year",
                        report.excluded(),
                        report.raw_rows
                    ))
                    .weak(),
                );
            }
        });
}

/// Blank fuel cells still form a selectable category.
fn fuel_label(fuel: &str) -> &str {
    if fuel.is_empty() {
        "(blank)"
    } else {
        fuel
    }
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
            if ui.button("Reload").clicked() {
                if let Some(path) = state.source.clone() {
                    state.load_path(&path);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} match",
                ds.len(),
                state.visible_rows()
            ));
        }

        for msg in [&state.status_message, &state.render_error].into_iter().flatten() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let payload = match state.export_payload() {
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            return;
        }
        None => return,
    };

    let file = rfd::FileDialog::new()
        .set_title("Save filtered listings")
        .set_file_name(&payload.filename)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = payload.write_to(&path) {
            log::error!("Failed to write {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
