use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

use super::model::{CleaningReport, Dataset, Exclusion, Record, MODEL_YEAR, PRICE, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean a listings CSV from disk.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path)?;
    let dataset = load_reader(file)?;
    log::info!(
        "Loaded {} listings from {} ({} of {} rows excluded)",
        dataset.len(),
        path.display(),
        dataset.report().excluded(),
        dataset.report().raw_rows
    );
    Ok(dataset)
}

/// CSV layout: header row with at least `price`, `model_year`, `fuel` and
/// `condition`. Any other column is carried through untouched. Column
/// names must be unique.
///
/// Rows whose `price` or `model_year` does not coerce to a number are
/// dropped and recorded in the dataset's [`CleaningReport`].
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(LoadError::DuplicateColumn(name.clone()));
        }
    }

    let index_of = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let [price_idx, year_idx, fuel_idx, condition_idx] = REQUIRED_COLUMNS.map(index_of);
    let (price_idx, year_idx, fuel_idx, condition_idx) =
        (price_idx?, year_idx?, fuel_idx?, condition_idx?);

    let mut records = Vec::new();
    let mut report = CleaningReport::default();

    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let row_no = i + 1;
        report.raw_rows += 1;

        let price_raw = row.get(price_idx).unwrap_or("");
        let year_raw = row.get(year_idx).unwrap_or("");
        let (price, model_year) = match (coerce_integer(price_raw), coerce_integer(year_raw)) {
            (Some(p), Some(y)) => (p, y),
            (p, _) => {
                let (column, value) = if p.is_none() {
                    (PRICE, price_raw)
                } else {
                    (MODEL_YEAR, year_raw)
                };
                log::debug!("Row {row_no}: excluded, {column} = '{value}' is not numeric");
                report.exclusions.push(Exclusion {
                    row: row_no,
                    column: column.to_string(),
                    value: value.to_string(),
                });
                continue;
            }
        };

        let mut extra = BTreeMap::new();
        for (col_idx, value) in row.iter().enumerate() {
            if [price_idx, year_idx, fuel_idx, condition_idx].contains(&col_idx) {
                continue;
            }
            extra.insert(headers[col_idx].clone(), value.to_string());
        }

        records.push(Record {
            price,
            model_year,
            fuel: row.get(fuel_idx).unwrap_or("").to_string(),
            condition: row.get(condition_idx).unwrap_or("").to_string(),
            extra,
        });
    }

    if report.raw_rows == 0 {
        return Err(LoadError::Empty);
    }
    if records.is_empty() {
        return Err(LoadError::NoValidRows {
            rows: report.raw_rows,
        });
    }

    Ok(Dataset::from_records(headers, records, report))
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Coerce a raw cell to an integer, truncating any fractional part.
///
/// Blank, unparsable, non-finite and out-of-range values fail.
pub fn coerce_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let f = s.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !f.is_finite() || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return None;
    }
    Some(f.trunc() as i64)
}
