use crate::error::{PipelineError, Result};

use super::model::{Dataset, PriceBounds, Record};

// ---------------------------------------------------------------------------
// Filter criteria: selected fuel + inclusive price range
// ---------------------------------------------------------------------------

/// The user's current selection in the side panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    fuel: String,
    min_price: i64,
    max_price: i64,
}

impl FilterCriteria {
    /// Fails with [`PipelineError::InvalidRange`] when `min_price > max_price`.
    pub fn new(fuel: impl Into<String>, min_price: i64, max_price: i64) -> Result<Self> {
        if min_price > max_price {
            return Err(PipelineError::InvalidRange {
                min: min_price,
                max: max_price,
            });
        }
        Ok(FilterCriteria {
            fuel: fuel.into(),
            min_price,
            max_price,
        })
    }

    /// Initial selection for a freshly loaded dataset: the first fuel value
    /// and the full observed price range. `None` for an empty dataset.
    pub fn default_for(dataset: &Dataset) -> Option<Self> {
        let fuel = dataset.fuels().first()?;
        let bounds = dataset.price_bounds()?;
        Some(FilterCriteria {
            fuel: fuel.clone(),
            min_price: bounds.min,
            max_price: bounds.max,
        })
    }

    pub fn fuel(&self) -> &str {
        &self.fuel
    }

    pub fn min_price(&self) -> i64 {
        self.min_price
    }

    pub fn max_price(&self) -> i64 {
        self.max_price
    }

    /// Pull both ends of the range inside `bounds`, keeping `min ≤ max`.
    pub fn clamp_to(mut self, bounds: PriceBounds) -> Self {
        self.min_price = self.min_price.clamp(bounds.min, bounds.max);
        self.max_price = self.max_price.clamp(self.min_price, bounds.max);
        self
    }

    /// Whether a record passes: same fuel and price within the range.
    pub fn matches(&self, record: &Record) -> bool {
        record.fuel == self.fuel && (self.min_price..=self.max_price).contains(&record.price)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – matching rows of a dataset
// ---------------------------------------------------------------------------

/// Indices of dataset records that passed a filter, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices previously taken from [`Self::indices`].
    /// Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        FilteredView {
            dataset,
            indices: indices.iter().copied().filter(|&i| i < dataset.len()).collect(),
        }
    }

    /// Apply `criteria` again on top of this view.
    pub fn refine(&self, criteria: &FilterCriteria) -> Self {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| criteria.matches(&self.dataset.records()[i]))
            .collect();
        FilteredView {
            dataset: self.dataset,
            indices,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the records of `dataset` matching `criteria`.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let view = FilteredView::all(dataset).refine(criteria);
    log::debug!(
        "Filter fuel={} price={}..={} kept {} of {} rows",
        criteria.fuel,
        criteria.min_price,
        criteria.max_price,
        view.len(),
        dataset.len()
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    fn dataset() -> Dataset {
        let csv = "\
price,model_year,fuel,condition
5000,2015,gas,good
12000,2018,diesel,excellent
800,2004,gas,fair
15000,2019,gas,like new
9000,2012,diesel,good
";
        load_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = FilterCriteria::new("gas", 10, 5).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRange { min: 10, max: 5 }));
        assert!(FilterCriteria::new("gas", 5, 5).is_ok());
    }

    #[test]
    fn test_fuel_and_inclusive_price_range() {
        let ds = dataset();
        let criteria = FilterCriteria::new("gas", 800, 5000).unwrap();
        let view = apply(&ds, &criteria);
        assert_eq!(view.indices(), [0, 2]);
        assert!(view.records().all(|r| r.fuel == "gas"));
    }

    #[test]
    fn test_no_match_gives_empty_view() {
        let ds = dataset();
        let criteria = FilterCriteria::new("diesel", 0, 100).unwrap();
        assert!(apply(&ds, &criteria).is_empty());

        let criteria = FilterCriteria::new("electric", 0, 100_000).unwrap();
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn test_refine_is_idempotent() {
        let ds = dataset();
        let criteria = FilterCriteria::new("diesel", 0, 20_000).unwrap();
        let once = apply(&ds, &criteria);
        let twice = once.refine(&criteria);
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn test_default_and_clamp() {
        let ds = dataset();
        let criteria = FilterCriteria::default_for(&ds).unwrap();
        assert_eq!(criteria.fuel(), "gas");
        assert_eq!((criteria.min_price(), criteria.max_price()), (800, 15000));

        let bounds = ds.price_bounds().unwrap();
        let clamped = FilterCriteria::new("gas", -50, 99_999).unwrap().clamp_to(bounds);
        assert_eq!((clamped.min_price(), clamped.max_price()), (800, 15000));

        let above = FilterCriteria::new("gas", 20_000, 30_000).unwrap().clamp_to(bounds);
        assert_eq!((above.min_price(), above.max_price()), (15000, 15000));
    }

    #[test]
    fn test_from_indices_drops_out_of_range() {
        let ds = dataset();
        let view = FilteredView::from_indices(&ds, &[1, 4, 99]);
        assert_eq!(view.indices(), [1, 4]);
    }
}
