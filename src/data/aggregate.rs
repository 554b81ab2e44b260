use std::collections::HashMap;

use crate::error::{PipelineError, Result};

use super::filter::FilteredView;
use super::model::Record;

// ---------------------------------------------------------------------------
// AggregateView – ordered (category, value) pairs
// ---------------------------------------------------------------------------

/// Grouped form of a [`FilteredView`]. Keys are exactly the categories
/// present in the view; no zero-filled entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateView<T> {
    pub field: String,
    pub groups: Vec<(String, T)>,
}

impl<T> AggregateView<T> {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&T> {
        self.groups
            .iter()
            .find(|(k, _)| k == category)
            .map(|(_, v)| v)
    }
}

impl AggregateView<usize> {
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, n)| n).sum()
    }
}

fn check_categorical(view: &FilteredView<'_>, field: &str) -> Result<()> {
    if view.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    if !view.dataset().has_column(field) {
        return Err(PipelineError::UnknownField(field.to_string()));
    }
    Ok(())
}

/// Group records by `field` in first-seen order, applying `value` to each.
fn group_first_seen<'a, T, F>(
    view: &FilteredView<'a>,
    field: &str,
    mut value: F,
) -> Vec<(String, Vec<T>)>
where
    F: FnMut(&'a Record) -> T,
{
    let mut slot: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    for rec in view.records() {
        let key = rec.text(field).unwrap_or_default().into_owned();
        let idx = *slot.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(value(rec));
    }
    groups
}

// ---------------------------------------------------------------------------
// Count and distribution modes
// ---------------------------------------------------------------------------

/// Count records per distinct value of `field`.
///
/// Ordered by descending count; ties keep first-seen order.
pub fn count_by(view: &FilteredView<'_>, field: &str) -> Result<AggregateView<usize>> {
    check_categorical(view, field)?;
    let mut groups: Vec<(String, usize)> = group_first_seen(view, field, |_| ())
        .into_iter()
        .map(|(k, v)| (k, v.len()))
        .collect();
    // sort_by is stable, so equal counts stay in first-seen order.
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(AggregateView {
        field: field.to_string(),
        groups,
    })
}

/// Keep every `numeric_field` value per distinct value of `category_field`.
///
/// Groups are in first-seen order, values in view order.
pub fn distribution_by(
    view: &FilteredView<'_>,
    category_field: &str,
    numeric_field: &str,
) -> Result<AggregateView<Vec<i64>>> {
    check_categorical(view, category_field)?;
    let probe = view.records().next().and_then(|r| r.numeric(numeric_field));
    if probe.is_none() {
        return Err(PipelineError::UnknownField(numeric_field.to_string()));
    }
    let groups = group_first_seen(view, category_field, |r| {
        r.numeric(numeric_field).unwrap_or_default()
    });
    Ok(AggregateView {
        field: category_field.to_string(),
        groups,
    })
}

// ---------------------------------------------------------------------------
// Histogram and scatter
// ---------------------------------------------------------------------------

/// One equal-width histogram bin covering `[start, end)`; the last bin is
/// closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Bin `numeric_field` into `bins` equal-width bins across the view's range.
/// A view whose values are all equal yields one unit-wide bin.
pub fn histogram(
    view: &FilteredView<'_>,
    numeric_field: &str,
    bins: usize,
) -> Result<Vec<HistogramBin>> {
    if view.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    let values: Vec<i64> = view
        .records()
        .map(|r| r.numeric(numeric_field))
        .collect::<Option<_>>()
        .ok_or_else(|| PipelineError::UnknownField(numeric_field.to_string()))?;

    let min = values.iter().copied().min().unwrap_or_default() as f64;
    let max = values.iter().copied().max().unwrap_or_default() as f64;
    if max == min || bins <= 1 {
        let end = if max == min { min + 1.0 } else { max };
        return Ok(vec![HistogramBin {
            start: min,
            end,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v as f64 - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    Ok(out)
}

/// `[x, y]` points of two numeric fields, in view order.
pub fn scatter(view: &FilteredView<'_>, x_field: &str, y_field: &str) -> Result<Vec<[f64; 2]>> {
    view.records()
        .map(|r| {
            let x = r
                .numeric(x_field)
                .ok_or_else(|| PipelineError::UnknownField(x_field.to_string()))?;
            let y = r
                .numeric(y_field)
                .ok_or_else(|| PipelineError::UnknownField(y_field.to_string()))?;
            Ok([x as f64, y as f64])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

/// Quartiles and Tukey whiskers of one distribution group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value ≥ q1 − 1.5·IQR.
    pub lower_whisker: f64,
    /// Largest value ≤ q3 + 1.5·IQR.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty slice.
    pub fn from_values(values: &[i64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::loader::load_reader;
    use crate::data::model::Dataset;

    fn dataset() -> Dataset {
        let csv = "\
price,model_year,fuel,condition,type
4000,2010,gas,good,sedan
6000,2012,diesel,excellent,truck
5000,2011,gas,excellent,sedan
7000,2014,diesel,good,truck
9000,2016,gas,good,SUV
";
        load_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_count_by_orders_by_count_then_first_seen() {
        let ds = dataset();
        let view = FilteredView::all(&ds);
        let counts = count_by(&view, "fuel").unwrap();
        assert_eq!(counts.groups, vec![("gas".to_string(), 3), ("diesel".to_string(), 2)]);
        assert_eq!(counts.total(), view.len());

        let by_type = count_by(&view, "type").unwrap();
        assert_eq!(
            by_type.groups,
            vec![
                ("sedan".to_string(), 2),
                ("truck".to_string(), 2),
                ("SUV".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_keys_are_only_present_categories() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::new("diesel", 0, 10_000).unwrap());
        let counts = count_by(&view, "fuel").unwrap();
        assert_eq!(counts.groups, vec![("diesel".to_string(), 2)]);
        assert_eq!(counts.get("gas"), None);
    }

    #[test]
    fn test_distribution_keeps_every_value() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::new("gas", 0, 10_000).unwrap());
        let dist = distribution_by(&view, "condition", "price").unwrap();
        assert_eq!(
            dist.groups,
            vec![
                ("good".to_string(), vec![4000, 9000]),
                ("excellent".to_string(), vec![5000]),
            ]
        );
    }

    #[test]
    fn test_empty_view_is_rejected() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::new("gas", 0, 10).unwrap());
        assert!(matches!(count_by(&view, "fuel"), Err(PipelineError::EmptyInput)));
        assert!(matches!(
            distribution_by(&view, "condition", "price"),
            Err(PipelineError::EmptyInput)
        ));
        assert!(matches!(histogram(&view, "price", 10), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let ds = dataset();
        let view = FilteredView::all(&ds);
        assert!(matches!(count_by(&view, "colour"), Err(PipelineError::UnknownField(_))));
        assert!(matches!(
            distribution_by(&view, "condition", "fuel"),
            Err(PipelineError::UnknownField(_))
        ));
        assert!(matches!(scatter(&view, "model_year", "type"), Err(PipelineError::UnknownField(_))));
    }

    #[test]
    fn test_histogram_counts_every_row() {
        let ds = dataset();
        let view = FilteredView::all(&ds);
        let bins = histogram(&view, "price", 5).unwrap();
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].start, 4000.0);
        assert_eq!(bins[4].end, 9000.0);
        // 9000 lands in the closed last bin.
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn test_histogram_single_value() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::new("gas", 9000, 9000).unwrap());
        let bins = histogram(&view, "price", 30).unwrap();
        assert_eq!(
            bins,
            vec![HistogramBin {
                start: 9000.0,
                end: 9001.0,
                count: 1
            }]
        );
    }

    #[test]
    fn test_scatter_points() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::new("diesel", 0, 10_000).unwrap());
        let points = scatter(&view, "model_year", "price").unwrap();
        assert_eq!(points, vec![[2012.0, 6000.0], [2014.0, 7000.0]]);
    }

    #[test]
    fn test_box_summary() {
        let s = BoxSummary::from_values(&[1, 2, 3, 4, 100]).unwrap();
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 4.0);
        assert_eq!(s.outliers, vec![100.0]);

        let single = BoxSummary::from_values(&[7]).unwrap();
        assert_eq!((single.q1, single.median, single.q3), (7.0, 7.0, 7.0));
        assert!(BoxSummary::from_values(&[]).is_none());
    }
}
