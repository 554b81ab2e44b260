use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const PRICE: &str = "price";
pub const MODEL_YEAR: &str = "model_year";
pub const FUEL: &str = "fuel";
pub const CONDITION: &str = "condition";

/// Columns every source must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [PRICE, MODEL_YEAR, FUEL, CONDITION];

/// Columns coerced to integers during cleaning.
pub const NUMERIC_COLUMNS: [&str; 2] = [PRICE, MODEL_YEAR];

// ---------------------------------------------------------------------------
// Record – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A single vehicle listing after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub price: i64,
    pub model_year: i64,
    pub fuel: String,
    pub condition: String,
    /// Every other column, kept verbatim: column_name → raw text.
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// The value of any column rendered as text, as it is exported.
    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            PRICE => Some(Cow::Owned(self.price.to_string())),
            MODEL_YEAR => Some(Cow::Owned(self.model_year.to_string())),
            FUEL => Some(Cow::Borrowed(self.fuel.as_str())),
            CONDITION => Some(Cow::Borrowed(self.condition.as_str())),
            other => self.extra.get(other).map(|v| Cow::Borrowed(v.as_str())),
        }
    }

    /// The value of a coerced numeric column; `None` for any other column.
    pub fn numeric(&self, column: &str) -> Option<i64> {
        match column {
            PRICE => Some(self.price),
            MODEL_YEAR => Some(self.model_year),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cleaning bookkeeping
// ---------------------------------------------------------------------------

/// A source row dropped because a numeric column failed coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// 1-based data row number in the source (header not counted).
    pub row: usize,
    /// First numeric column that failed.
    pub column: String,
    /// The offending raw value.
    pub value: String,
}

/// What happened to the source rows during cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub raw_rows: usize,
    pub exclusions: Vec<Exclusion>,
}

impl CleaningReport {
    pub fn excluded(&self) -> usize {
        self.exclusions.len()
    }

    pub fn kept(&self) -> usize {
        self.raw_rows - self.exclusions.len()
    }
}

/// Observed `[min, max]` of the price column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: i64,
    pub max: i64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned table
// ---------------------------------------------------------------------------

/// The cleaned dataset with pre-computed lookups for the side panel.
///
/// Built once per loaded file and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    report: CleaningReport,
    /// Distinct fuel values in first-seen order.
    fuels: Vec<String>,
    price_bounds: Option<PriceBounds>,
}

impl Dataset {
    /// Build lookups from the cleaned records. `columns` is the source
    /// header order.
    pub fn from_records(columns: Vec<String>, records: Vec<Record>, report: CleaningReport) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut fuels = Vec::new();
        for rec in &records {
            if seen.insert(rec.fuel.as_str()) {
                fuels.push(rec.fuel.clone());
            }
        }

        let price_bounds = records.iter().map(|r| r.price).fold(None, |acc, p| match acc {
            None => Some(PriceBounds { min: p, max: p }),
            Some(b) => Some(PriceBounds {
                min: b.min.min(p),
                max: b.max.max(p),
            }),
        });

        Dataset {
            columns,
            records,
            report,
            fuels,
            price_bounds,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    /// Values offered by the fuel selector.
    pub fn fuels(&self) -> &[String] {
        &self.fuels
    }

    /// Bounds for the price range control; `None` only for an empty dataset.
    pub fn price_bounds(&self) -> Option<PriceBounds> {
        self.price_bounds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: i64, fuel: &str) -> Record {
        Record {
            price,
            model_year: 2015,
            fuel: fuel.to_string(),
            condition: "good".to_string(),
            extra: BTreeMap::from([("model".to_string(), "ford f-150".to_string())]),
        }
    }

    #[test]
    fn test_lookups_follow_first_seen_order() {
        let ds = Dataset::from_records(
            vec!["price".into(), "fuel".into()],
            vec![record(900, "gas"), record(100, "diesel"), record(500, "gas")],
            CleaningReport::default(),
        );
        assert_eq!(ds.fuels(), ["gas", "diesel"]);
        assert_eq!(ds.price_bounds(), Some(PriceBounds { min: 100, max: 900 }));
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = Dataset::from_records(vec![], vec![], CleaningReport::default());
        assert!(ds.is_empty());
        assert_eq!(ds.price_bounds(), None);
        assert!(ds.fuels().is_empty());
    }

    #[test]
    fn test_record_field_access() {
        let r = record(5000, "gas");
        assert_eq!(r.text("price").as_deref(), Some("5000"));
        assert_eq!(r.text("model").as_deref(), Some("ford f-150"));
        assert_eq!(r.text("missing"), None);
        assert_eq!(r.numeric("model_year"), Some(2015));
        assert_eq!(r.numeric("fuel"), None);
    }
}
