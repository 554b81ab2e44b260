use std::path::Path;

use crate::error::{PipelineError, Result};

use super::filter::FilteredView;

/// Default name offered by the save dialog.
pub const DEFAULT_EXPORT_FILENAME: &str = "filtered_vehicles_data.csv";

/// Serialized rows ready to hand to the download action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        log::info!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

/// Serialize a view as CSV: header row in dataset column order, one line per
/// record, no index column. An empty view gives a header-only payload.
pub fn export_csv(view: &FilteredView<'_>) -> Result<ExportPayload> {
    export_csv_named(view, DEFAULT_EXPORT_FILENAME)
}

pub fn export_csv_named(view: &FilteredView<'_>, filename: &str) -> Result<ExportPayload> {
    let columns = view.dataset().columns();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for rec in view.records() {
        writer.write_record(
            columns
                .iter()
                .map(|c| rec.text(c).unwrap_or_default().into_owned()),
        )?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))?;
    Ok(ExportPayload {
        filename: filename.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::loader::load_reader;

    const SOURCE: &str = "\
price,model_year,model,condition,fuel,is_4wd
5000.0,2015,ford f-150,good,gas,1.0
6500,2013,\"chevrolet silverado, 1500\",fair,gas,
abc,2016,honda civic,good,gas,
14000,2018,ram 2500,excellent,diesel,1.0
";

    #[test]
    fn test_header_and_rows_in_schema_order() {
        let ds = load_reader(SOURCE.as_bytes()).unwrap();
        let view = apply(&ds, &FilterCriteria::new("gas", 0, 10_000).unwrap());
        let payload = export_csv(&view).unwrap();
        assert_eq!(payload.filename, "filtered_vehicles_data.csv");

        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(
            text,
            "price,model_year,model,condition,fuel,is_4wd\n\
             5000,2015,ford f-150,good,gas,1.0\n\
             6500,2013,\"chevrolet silverado, 1500\",fair,gas,\n"
        );
    }

    #[test]
    fn test_empty_view_is_header_only() {
        let ds = load_reader(SOURCE.as_bytes()).unwrap();
        let view = apply(&ds, &FilterCriteria::new("diesel", 0, 10).unwrap());
        let payload = export_csv_named(&view, "none.csv").unwrap();
        assert_eq!(payload.filename, "none.csv");
        assert_eq!(
            String::from_utf8(payload.bytes).unwrap(),
            "price,model_year,model,condition,fuel,is_4wd\n"
        );
    }
}
