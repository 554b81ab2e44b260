use std::path::{Path, PathBuf};

use listings_dash::config::DashboardConfig;
use listings_dash::data::export::{export_csv_named, ExportPayload};
use listings_dash::data::filter::FilterCriteria;
use listings_dash::data::loader::load_file;
use listings_dash::data::model::Dataset;
use listings_dash::pipeline::{render, RenderOutcome};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Current fuel + price range selection.
    pub criteria: Option<FilterCriteria>,

    /// Result of rendering `criteria` against `dataset` (cached until the
    /// selection changes).
    pub outcome: Option<RenderOutcome>,

    /// Whether the full cleaned table is shown below the charts.
    pub show_raw: bool,

    /// Colours per fuel value and per condition value.
    pub fuel_colors: Option<ColorMap>,
    pub condition_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Error from the last render of the current selection. Cleared by the
    /// next successful render.
    pub render_error: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source: None,
            criteria: None,
            outcome: None,
            show_raw: false,
            fuel_colors: None,
            condition_colors: None,
            status_message: None,
            render_error: None,
        }
    }

    /// Load a CSV and make it the current dataset. A failed load clears the
    /// dashboard and leaves the error in `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings with columns {:?}",
                    dataset.len(),
                    dataset.columns()
                );
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.source = None;
                self.criteria = None;
                self.outcome = None;
                self.fuel_colors = None;
                self.condition_colors = None;
                self.render_error = None;
                self.status_message = Some(format!("Error loading {}: {e}", path.display()));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise the selection and colours.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.criteria = FilterCriteria::default_for(&dataset);
        self.fuel_colors = Some(ColorMap::new(
            "fuel",
            dataset.fuels().iter().map(String::as_str),
        ));
        self.condition_colors = Some(ColorMap::new(
            "condition",
            dataset.records().iter().map(|r| r.condition.as_str()),
        ));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.rerender();
    }

    /// Recompute `outcome` from the dataset and the current selection.
    pub fn rerender(&mut self) {
        let (Some(ds), Some(criteria)) = (&self.dataset, &self.criteria) else {
            self.outcome = None;
            self.render_error = None;
            return;
        };
        match render(ds, criteria, self.config.render_options()) {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.render_error = None;
            }
            Err(e) => {
                log::error!("Render failed: {e}");
                self.render_error = Some(format!("Error: {e}"));
                self.outcome = None;
            }
        }
    }

    /// Switch the selected fuel, keeping the price range.
    pub fn set_fuel(&mut self, fuel: &str) {
        let Some((min, max)) = self
            .criteria
            .as_ref()
            .map(|c| (c.min_price(), c.max_price()))
        else {
            return;
        };
        self.update_criteria(fuel.to_string(), min, max);
    }

    /// Set the price range. When the ends cross, the one not being dragged
    /// follows the other.
    pub fn set_price_range(&mut self, min: i64, max: i64) {
        let Some((fuel, current_min)) = self
            .criteria
            .as_ref()
            .map(|c| (c.fuel().to_string(), c.min_price()))
        else {
            return;
        };
        let (min, max) = match (min > max, min != current_min) {
            (false, _) => (min, max),
            (true, true) => (min, min),
            (true, false) => (max, max),
        };
        self.update_criteria(fuel, min, max);
    }

    fn update_criteria(&mut self, fuel: String, min: i64, max: i64) {
        match FilterCriteria::new(fuel, min, max) {
            Ok(criteria) => {
                let criteria = match self.dataset.as_ref().and_then(Dataset::price_bounds) {
                    Some(bounds) => criteria.clamp_to(bounds),
                    None => criteria,
                };
                if self.criteria.as_ref() != Some(&criteria) {
                    self.criteria = Some(criteria);
                    self.rerender();
                }
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Serialize the current selection for download. `None` when nothing is
    /// selected or the selection matched no rows.
    pub fn export_payload(&self) -> Option<anyhow::Result<ExportPayload>> {
        let ds = self.dataset.as_ref()?;
        let RenderOutcome::Ready(vm) = self.outcome.as_ref()? else {
            return None;
        };
        Some(export_csv_named(&vm.view(ds), &self.config.export_filename).map_err(Into::into))
    }

    /// Number of rows matching the current selection.
    pub fn visible_rows(&self) -> usize {
        match &self.outcome {
            Some(RenderOutcome::Ready(vm)) => vm.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listings_dash::data::loader::load_reader;

    fn state() -> AppState {
        let csv = "\
price,model_year,fuel,condition
1000,2005,gas,fair
5000,2010,gas,good
9000,2015,gas,excellent
20000,2018,diesel,good
";
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(load_reader(csv.as_bytes()).unwrap());
        state
    }

    fn range(state: &AppState) -> (i64, i64) {
        let c = state.criteria.as_ref().unwrap();
        (c.min_price(), c.max_price())
    }

    #[test]
    fn test_dataset_sets_default_selection() {
        let state = state();
        assert_eq!(state.criteria.as_ref().unwrap().fuel(), "gas");
        assert_eq!(range(&state), (1000, 20_000));
        assert_eq!(state.visible_rows(), 3);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_min_dragged_past_max_pulls_max_up() {
        let mut state = state();
        state.set_price_range(5000, 9000);
        state.set_price_range(12_000, 9000);
        assert_eq!(range(&state), (12_000, 12_000));
    }

    #[test]
    fn test_max_dragged_below_min_pulls_min_down() {
        let mut state = state();
        state.set_price_range(5000, 9000);
        state.set_price_range(5000, 3000);
        assert_eq!(range(&state), (3000, 3000));
    }

    #[test]
    fn test_price_range_is_clamped_to_dataset() {
        let mut state = state();
        state.set_price_range(5000, 9000);
        state.set_price_range(-10, 99_999);
        assert_eq!(range(&state), (1000, 20_000));
    }

    #[test]
    fn test_no_results_disables_export() {
        let mut state = state();
        state.set_price_range(5000, 9000);
        state.set_fuel("diesel");
        assert!(matches!(state.outcome, Some(RenderOutcome::NoResults { .. })));
        assert!(state.export_payload().is_none());
        assert_eq!(state.visible_rows(), 0);
    }

    #[test]
    fn test_matching_selection_exports_named_payload() {
        let mut state = state();
        state.set_price_range(5000, 9000);
        let payload = state.export_payload().unwrap().unwrap();
        assert_eq!(payload.filename, "filtered_vehicles_data.csv");
        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_successful_render_clears_previous_render_error() {
        let mut state = state();
        state.render_error = Some("Error: stale".to_string());
        state.set_price_range(5000, 9000);
        assert!(state.render_error.is_none());
        assert!(matches!(state.outcome, Some(RenderOutcome::Ready(_))));
    }

    #[test]
    fn test_failed_load_clears_dashboard() {
        let mut state = state();
        let dir = tempfile::tempdir().unwrap();
        state.load_path(&dir.path().join("missing.csv"));
        assert!(state.dataset.is_none());
        assert!(state.outcome.is_none());
        assert!(state.export_payload().is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error loading"));
    }
}
