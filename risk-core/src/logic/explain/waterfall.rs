//! Waterfall layout for a single explanation
//!
//! Rows are ordered by absolute contribution, largest first. Each row spans
//! `start..end`; chained bottom-up they lead from the baseline to the output.

use serde::{Deserialize, Serialize};

use super::types::FeatureContribution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallRow {
    pub label: String,
    /// `None` for the folded "other features" row
    pub feature_value: Option<f32>,
    pub contribution: f64,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waterfall {
    pub base_value: f64,
    pub output_value: f64,
    pub rows: Vec<WaterfallRow>,
}

impl Waterfall {
    /// At most `max_display` rows; beyond that the smallest are folded into one
    pub fn build(contributions: &[FeatureContribution], base_value: f64, max_display: usize) -> Self {
        let max_display = max_display.max(1);

        let mut order: Vec<usize> = (0..contributions.len()).collect();
        order.sort_by(|&a, &b| {
            contributions[b]
                .attribution
                .abs()
                .total_cmp(&contributions[a].attribution.abs())
        });

        let (shown, folded) = if order.len() > max_display {
            order.split_at(max_display - 1)
        } else {
            (&order[..], &[][..])
        };

        let mut rows: Vec<WaterfallRow> = shown
            .iter()
            .map(|&i| WaterfallRow {
                label: contributions[i].name.clone(),
                feature_value: Some(contributions[i].value),
                contribution: contributions[i].attribution,
                start: 0.0,
                end: 0.0,
            })
            .collect();

        if !folded.is_empty() {
            rows.push(WaterfallRow {
                label: format!("{} other features", folded.len()),
                feature_value: None,
                contribution: folded.iter().map(|&i| contributions[i].attribution).sum(),
                start: 0.0,
                end: 0.0,
            });
        }

        let mut acc = base_value;
        for row in rows.iter_mut().rev() {
            row.start = acc;
            acc += row.contribution;
            row.end = acc;
        }

        Self {
            base_value,
            output_value: acc,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributions(values: &[f64]) -> Vec<FeatureContribution> {
        values
            .iter()
            .enumerate()
            .map(|(i, &attribution)| FeatureContribution {
                name: format!("f{}", i),
                value: i as f32,
                attribution,
            })
            .collect()
    }

    #[test]
    fn test_rows_sorted_by_magnitude() {
        let wf = Waterfall::build(&contributions(&[0.1, -0.5, 0.3]), -1.0, 10);
        let labels: Vec<_> = wf.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["f1", "f2", "f0"]);
        assert!(wf.rows.iter().all(|r| r.feature_value.is_some()));
    }

    #[test]
    fn test_nan_attributions_sort_first_without_panicking() {
        let values = [0.1, f64::NAN, -0.5, 0.3, f64::NAN];
        let wf = Waterfall::build(&contributions(&values), 0.0, 10);
        let labels: Vec<_> = wf.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["f1", "f4", "f2", "f3", "f0"]);
    }

    #[test]
    fn test_rows_chain_from_base_to_output() {
        let wf = Waterfall::build(&contributions(&[0.1, -0.5, 0.3]), -1.0, 10);
        assert!((wf.output_value - (-1.1)).abs() < 1e-12);

        // Bottom row starts at the baseline, top row ends at the output
        assert_eq!(wf.rows.last().unwrap().start, -1.0);
        assert!((wf.rows[0].end - wf.output_value).abs() < 1e-12);
        for pair in wf.rows.windows(2) {
            assert!((pair[0].start - pair[1].end).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tail_folded_into_other_features() {
        let values = [0.9, 0.01, -0.8, 0.02, 0.7, -0.03];
        let wf = Waterfall::build(&contributions(&values), 0.0, 4);

        assert_eq!(wf.rows.len(), 4);
        let labels: Vec<_> = wf.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["f0", "f2", "f4", "3 other features"]);

        let other = &wf.rows[3];
        assert_eq!(other.feature_value, None);
        assert!((other.contribution - 0.0).abs() < 1e-12);
        assert!((wf.output_value - values.iter().sum::<f64>()).abs() < 1e-12);
    }

    #[test]
    fn test_exactly_max_display_not_folded() {
        let wf = Waterfall::build(&contributions(&[0.1, 0.2, 0.3]), 0.0, 3);
        assert_eq!(wf.rows.len(), 3);
        assert!(wf.rows.iter().all(|r| !r.label.contains("other")));
    }

    #[test]
    fn test_empty_contributions() {
        let wf = Waterfall::build(&[], 0.25, 10);
        assert!(wf.rows.is_empty());
        assert_eq!(wf.output_value, 0.25);
    }
}
