use crate::data::aggregate::{
    count_by, distribution_by, histogram, scatter, AggregateView, HistogramBin,
};
use crate::data::filter::{apply, FilterCriteria, FilteredView};
use crate::data::model::{Dataset, CONDITION, FUEL, MODEL_YEAR, PRICE};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Render options
// ---------------------------------------------------------------------------

/// Tunables for the derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub histogram_bins: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { histogram_bins: 30 }
    }
}

// ---------------------------------------------------------------------------
// ViewModel – everything the charts need for one selection
// ---------------------------------------------------------------------------

/// Derived views for a non-empty selection. Owns its data so the caller can
/// keep it between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub criteria: FilterCriteria,
    /// Dataset indices of the matching records.
    pub indices: Vec<usize>,
    pub fuel_counts: AggregateView<usize>,
    pub price_by_condition: AggregateView<Vec<i64>>,
    pub price_histogram: Vec<HistogramBin>,
    /// `[model_year, price]` per matching record.
    pub year_vs_price: Vec<[f64; 2]>,
}

impl ViewModel {
    /// Re-attach the matching rows to the dataset they came from.
    pub fn view<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        FilteredView::from_indices(dataset, &self.indices)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The selection is valid but matches no rows; nothing was aggregated.
    NoResults { criteria: FilterCriteria },
    Ready(ViewModel),
}

/// Filter `dataset` by `criteria` and build every chart view from the
/// matching rows. Pure: same inputs, same outcome.
pub fn render(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    options: RenderOptions,
) -> Result<RenderOutcome> {
    let view = apply(dataset, criteria);
    if view.is_empty() {
        return Ok(RenderOutcome::NoResults {
            criteria: criteria.clone(),
        });
    }

    Ok(RenderOutcome::Ready(ViewModel {
        criteria: criteria.clone(),
        fuel_counts: count_by(&view, FUEL)?,
        price_by_condition: distribution_by(&view, CONDITION, PRICE)?,
        price_histogram: histogram(&view, PRICE, options.histogram_bins)?,
        year_vs_price: scatter(&view, MODEL_YEAR, PRICE)?,
        indices: view.indices().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    fn dataset() -> Dataset {
        let csv = "\
price,model_year,fuel,condition
5000,2015,gas,good
5200,2016,diesel,good
8000,2017,diesel,excellent
900,2003,gas,salvage
";
        load_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_empty_selection_short_circuits() {
        let ds = dataset();
        let criteria = FilterCriteria::new("diesel", 0, 100).unwrap();
        let outcome = render(&ds, &criteria, RenderOptions::default()).unwrap();
        assert_eq!(outcome, RenderOutcome::NoResults { criteria });
    }

    #[test]
    fn test_ready_views_agree_with_each_other() {
        let ds = dataset();
        let criteria = FilterCriteria::new("diesel", 0, 10_000).unwrap();
        let RenderOutcome::Ready(vm) = render(&ds, &criteria, RenderOptions::default()).unwrap()
        else {
            panic!("expected matching rows");
        };
        assert_eq!(vm.indices, vec![1, 2]);
        assert_eq!(vm.fuel_counts.groups, vec![("diesel".to_string(), 2)]);
        assert_eq!(vm.fuel_counts.total(), vm.len());
        assert_eq!(
            vm.price_by_condition.groups,
            vec![
                ("good".to_string(), vec![5200]),
                ("excellent".to_string(), vec![8000]),
            ]
        );
        assert_eq!(vm.price_histogram.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(vm.year_vs_price, vec![[2016.0, 5200.0], [2017.0, 8000.0]]);
        assert_eq!(vm.view(&ds).len(), 2);
    }

    #[test]
    fn test_render_is_repeatable() {
        let ds = dataset();
        let criteria = FilterCriteria::new("gas", 0, 10_000).unwrap();
        let opts = RenderOptions { histogram_bins: 4 };
        let a = render(&ds, &criteria, opts).unwrap();
        let b = render(&ds, &criteria, opts).unwrap();
        assert_eq!(a, b);
    }
}
