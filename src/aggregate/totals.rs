// Per-year counts and the data-coverage signal shared by both aggregations

use crate::aggregate::year::{iso_year, year_end};
use crate::interval::parse_timestamp;
use crate::model::Idea;
use serde::{Deserialize, Serialize};

/// Idea counts for one year of an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearTotals {
    /// Ideas in scope for the year
    pub total: usize,
    /// Ideas completed within the year
    pub done: usize,
    /// Ideas not completed by the year's last instant (lifecycle reports
    /// count those not completed within the year)
    pub ongoing_at_boundary: usize,
    /// Ideas with no completion milestone at all
    pub ongoing_now: usize,
    /// Ideas that contributed at least one statistical sample
    pub sample: usize,
}

impl YearTotals {
    /// Tally the in-scope ideas of `year`
    pub fn tally<'a, I>(year: i32, ideas: I, sample: usize) -> Self
    where
        I: IntoIterator<Item = &'a Idea>,
    {
        let boundary = year_end(year);
        let mut totals = YearTotals {
            sample,
            ..Default::default()
        };
        let mut done_by_boundary = 0;

        for idea in ideas {
            totals.total += 1;
            let done_at = idea.done_at();
            if iso_year(done_at) == Some(year) {
                totals.done += 1;
            }
            match (done_at.and_then(parse_timestamp), boundary) {
                (Some(at), Some(end)) if at <= end => done_by_boundary += 1,
                _ => {}
            }
            if done_at.is_none() {
                totals.ongoing_now += 1;
            }
        }

        totals.ongoing_at_boundary = totals.total.saturating_sub(done_by_boundary);
        totals
    }
}

/// Whether an aggregation has anything to show
///
/// Lets a consumer render "no data" instead of an empty chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Coverage {
    /// The input batch held no ideas
    NoIdeas,
    /// Ideas exist, but no year produced a statistical sample
    NoSamples,
    /// Some years have samples; the listed years have none
    Partial { years_without_samples: Vec<i32> },
    /// Every requested year has samples
    Complete,
}

impl Coverage {
    /// Classify from the idea count and per-year sample sizes
    pub fn assess(idea_count: usize, samples: impl IntoIterator<Item = (i32, usize)>) -> Self {
        if idea_count == 0 {
            return Coverage::NoIdeas;
        }
        let samples: Vec<(i32, usize)> = samples.into_iter().collect();
        let empty: Vec<i32> = samples
            .iter()
            .filter(|(_, n)| *n == 0)
            .map(|(year, _)| *year)
            .collect();

        if empty.len() == samples.len() {
            Coverage::NoSamples
        } else if empty.is_empty() {
            Coverage::Complete
        } else {
            Coverage::Partial {
                years_without_samples: empty,
            }
        }
    }

    /// Whether there is at least one sample to plot
    pub fn has_data(&self) -> bool {
        matches!(self, Coverage::Partial { .. } | Coverage::Complete)
    }
}
