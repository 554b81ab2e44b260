use eframe::egui::{Color32, ScrollArea, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use listings_dash::data::aggregate::BoxSummary;
use listings_dash::data::model::Dataset;
use listings_dash::pipeline::{RenderOutcome, ViewModel};

use crate::color::ColorMap;
use crate::state::AppState;
use crate::ui::table::records_table;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the preview table, the charts for the current selection and,
/// when toggled, the full cleaned table.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.status_message.is_some() {
                ui.heading("No listings loaded. Open another file  (File → Open…)");
            } else {
                ui.heading("Open a listings CSV to begin  (File → Open…)");
            }
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data preview");
            let preview: Vec<usize> = (0..dataset.len().min(state.config.preview_rows)).collect();
            records_table(ui, "preview", dataset, &preview, 240.0);
            ui.separator();

            match &state.outcome {
                None => {
                    ui.label("Select a fuel type and price range.");
                }
                Some(RenderOutcome::NoResults { criteria }) => {
                    ui.colored_label(
                        Color32::from_rgb(230, 160, 40),
                        format!(
                            "No listings with fuel '{}' priced between {} and {}.",
                            criteria.fuel(),
                            criteria.min_price(),
                            criteria.max_price()
                        ),
                    );
                }
                Some(RenderOutcome::Ready(vm)) => charts(ui, state, vm),
            }

            if state.show_raw {
                raw_data(ui, dataset);
            }
        });
}

fn raw_data(ui: &mut Ui, dataset: &Dataset) {
    ui.separator();
    ui.heading(format!("Raw data ({} rows)", dataset.len()));
    let all: Vec<usize> = (0..dataset.len()).collect();
    records_table(ui, "raw", dataset, &all, 400.0);
}

fn charts(ui: &mut Ui, state: &AppState, vm: &ViewModel) {
    let fuel_color = state
        .fuel_colors
        .as_ref()
        .map(|cm| cm.color_for(vm.criteria.fuel()))
        .unwrap_or(Color32::LIGHT_BLUE);

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Price distribution");
        price_histogram(&mut cols[0], vm, fuel_color);
        cols[1].strong("Price vs model year");
        year_price_scatter(&mut cols[1], vm, fuel_color);
    });
    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Listings by fuel type");
        fuel_bars(&mut cols[0], vm, state.fuel_colors.as_ref());
        cols[1].strong("Price by condition");
        condition_boxes(&mut cols[1], vm, state.condition_colors.as_ref());
    });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn price_histogram(ui: &mut Ui, vm: &ViewModel, color: Color32) {
    let bars: Vec<Bar> = vm
        .price_histogram
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.0} – {:.0}", bin.start, bin.end))
        })
        .collect();

    Plot::new("price_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("price")
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).name("price"));
        });
}

fn year_price_scatter(ui: &mut Ui, vm: &ViewModel, color: Color32) {
    let points: PlotPoints = vm.year_vs_price.iter().copied().collect();

    Plot::new("year_vs_price")
        .height(CHART_HEIGHT)
        .x_axis_label("model_year")
        .y_axis_label("price")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.5)
                    .color(color)
                    .name(vm.criteria.fuel()),
            );
        });
}

/// One bar chart per category so each fuel gets its own legend entry.
fn fuel_bars(ui: &mut Ui, vm: &ViewModel, colors: Option<&ColorMap>) {
    let title = colors.map(|cm| cm.column.as_str()).unwrap_or("fuel");

    Plot::new("fuel_counts")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(title)
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (fuel, count)) in vm.fuel_counts.groups.iter().enumerate() {
                let color = colors
                    .map(|cm| cm.color_for(fuel))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let bar = Bar::new(i as f64, *count as f64).width(0.6).name(fuel);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(fuel));
            }
        });
}

fn condition_boxes(ui: &mut Ui, vm: &ViewModel, colors: Option<&ColorMap>) {
    Plot::new("price_by_condition")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("condition")
        .y_axis_label("price")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (condition, prices)) in vm.price_by_condition.groups.iter().enumerate() {
                let Some(summary) = BoxSummary::from_values(prices) else {
                    continue;
                };
                let color = colors
                    .map(|cm| cm.color_for(condition))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let x = i as f64;
                let spread = BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(condition)
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(condition));

                if !summary.outliers.is_empty() {
                    let outliers: PlotPoints = summary.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(outliers).radius(2.0).color(color).name(condition));
                }
            }
        });
}
