use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use listings_dash::data::model::Dataset;

// ---------------------------------------------------------------------------
// Record table (preview and raw data)
// ---------------------------------------------------------------------------

/// Render the given dataset rows with one column per source column.
pub fn records_table(ui: &mut Ui, id: &str, dataset: &Dataset, rows: &[usize], max_height: f32) {
    let columns = dataset.columns();
    let records = dataset.records();

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(max_height)
                .columns(Column::auto().at_least(60.0), columns.len())
                .header(20.0, |mut header| {
                    for col in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let Some(rec) = rows.get(row.index()).and_then(|&i| records.get(i)) else {
                            return;
                        };
                        for col in columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(rec.text(col).as_deref().unwrap_or(""));
                            });
                        }
                    });
                });
        });
    });
}
