use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::export::DEFAULT_EXPORT_FILENAME;
use crate::pipeline::RenderOptions;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Upper bound on `histogram_bins`; larger values are capped.
pub const MAX_HISTOGRAM_BINS: usize = 500;

/// Dashboard settings. Every key is optional in `dashboard.json`:
///
/// ```json
/// {
///   "data_path": "vehicles_us.csv",
///   "export_filename": "filtered_vehicles_data.csv",
///   "histogram_bins": 30,
///   "preview_rows": 10
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at startup.
    pub data_path: PathBuf,
    /// Name offered by the download dialog.
    pub export_filename: String,
    pub histogram_bins: usize,
    /// Rows shown in the preview table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("vehicles_us.csv"),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            histogram_bins: RenderOptions::default().histogram_bins,
            preview_rows: 10,
        }
    }
}

impl DashboardConfig {
    /// Read a config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            histogram_bins: self.histogram_bins.clamp(1, MAX_HISTOGRAM_BINS),
        }
    }
}
