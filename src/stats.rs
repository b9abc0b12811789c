//! Summary statistics over day-valued samples
//!
//! Both statistics discard non-finite values first and return `None` for an
//! empty sample, so "no data" never collapses into a zero duration.

use crate::interval::round2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which summary statistic a chart plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Middle value of the sample (default)
    #[default]
    Median,
    /// Arithmetic mean of the sample
    Average,
}

impl Metric {
    /// Human-readable label used in report headings
    pub fn label(self) -> &'static str {
        match self {
            Metric::Median => "Median",
            Metric::Average => "Average",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sample size plus median and average of one group of durations
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Number of finite values in the sample
    pub n: usize,
    pub median: Option<f64>,
    pub average: Option<f64>,
}

impl MetricSummary {
    /// Summarise a sample of day values
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            n: values.iter().filter(|v| v.is_finite()).count(),
            median: median(values),
            average: average(values),
        }
    }

    /// Value of the selected statistic
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Median => self.median,
            Metric::Average => self.average,
        }
    }
}

/// Median of the finite values, rounded to two decimals
///
/// Even-length samples use the mean of the two middle elements.
///
/// # Example
/// ```
/// use ideaflow::stats::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[5.0, 15.0]), Some(10.0));
/// assert_eq!(median(&[]), None);
/// ```
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    let value = if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };
    Some(round2(value))
}

/// Arithmetic mean of the finite values, rounded to two decimals
pub fn average(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(round2(sum / count as f64))
}

/// Render a day value with two decimals, `--` when absent
pub fn format_days(value: Option<f64>) -> String {
    match value {
        Some(days) if days.is_finite() => format!("{:.2}", days),
        _ => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[9.0, 1.0, 5.0, 3.0, 7.0]), Some(5.0));
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[15.0, 5.0]), Some(10.0));
    }

    #[test]
    fn test_median_rounds() {
        assert_eq!(median(&[1.111, 2.222]), Some(1.67));
    }

    #[test]
    fn test_average_basic() {
        assert_eq!(average(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(average(&[1.0, 2.0]), Some(1.5));
        assert_eq!(average(&[1.0, 1.0, 2.0]), Some(1.33));
    }

    #[test]
    fn test_empty_is_none_not_zero() {
        assert_eq!(median(&[]), None);
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn test_non_finite_ignored() {
        let values = [f64::NAN, 4.0, f64::INFINITY, 2.0, f64::NEG_INFINITY];
        assert_eq!(median(&values), Some(3.0));
        assert_eq!(average(&values), Some(3.0));

        let garbage = [f64::NAN, f64::INFINITY];
        assert_eq!(median(&garbage), None);
        assert_eq!(average(&garbage), None);
    }

    #[test]
    fn test_summary_counts_finite_only() {
        let summary = MetricSummary::from_values(&[5.0, f64::NAN, 15.0]);
        assert_eq!(summary.n, 2);
        assert_eq!(summary.median, Some(10.0));
        assert_eq!(summary.average, Some(10.0));
        assert_eq!(summary.metric(Metric::Median), Some(10.0));
        assert_eq!(summary.metric(Metric::Average), Some(10.0));
    }

    #[test]
    fn test_summary_default_is_empty() {
        let summary = MetricSummary::from_values(&[]);
        assert_eq!(summary, MetricSummary::default());
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(Some(10.0)), "10.00");
        assert_eq!(format_days(Some(0.333)), "0.33");
        assert_eq!(format_days(None), "--");
        assert_eq!(format_days(Some(f64::NAN)), "--");
    }
}
