// Pre-computed ("public") aggregates shipped instead of raw ideas
//
// Some exports strip the idea records and publish only the summary tables.
// Values are read leniently: metrics become finite two-decimal numbers or
// nothing, counts become non-negative integers, and a malformed node (null,
// wrong type) is skipped without discarding its siblings.

use crate::aggregate::cycle_time::{CycleTimeReport, CycleTimeYear, TeamCycleStats};
use crate::aggregate::lifecycle_days::{LifecycleReport, LifecycleYear, PhaseStats, TeamPhaseStats};
use crate::aggregate::totals::{Coverage, YearTotals};
use crate::interval::round2;
use crate::lifecycle::PhaseSet;
use crate::stats::MetricSummary;
use crate::team::{EffortScope, TeamBucket, TeamRoster, UNMAPPED};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Finite number (or numeric string) rounded to two decimals
fn to_finite_metric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then(|| round2(number))
}

/// Non-negative integer count; anything else is zero
fn to_count(value: &Value) -> usize {
    match to_finite_metric(value) {
        Some(n) if n >= 0.0 => n.trunc() as usize,
        _ => 0,
    }
}

/// JSON object keyed by name whose unreadable entries are dropped one by one
///
/// Anything other than an object reads as an empty map.
#[derive(Debug, Clone)]
pub struct LenientMap<T>(BTreeMap<String, T>);

impl<T> Default for LenientMap<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> LenientMap<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for LenientMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Object(entries) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };
        let map = entries
            .into_iter()
            .filter_map(|(key, node)| match serde_json::from_value(node) {
                Ok(value) => Some((key, value)),
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "skipping malformed published node");
                    None
                }
            })
            .collect();
        Ok(Self(map))
    }
}

/// Section that falls back to empty when it has the wrong shape
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// `{n, median, average}` cell as published
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicMetric {
    pub n: Value,
    pub median: Value,
    pub average: Value,
}

impl PublicMetric {
    fn summary(&self) -> MetricSummary {
        MetricSummary {
            n: to_count(&self.n),
            median: to_finite_metric(&self.median),
            average: to_finite_metric(&self.average),
        }
    }
}

/// Per-year totals as published
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicTotals {
    pub total: Value,
    pub done: Value,
    #[serde(alias = "ongoing")]
    pub ongoing_year_end: Value,
    pub ongoing_now: Value,
    pub cycle_sample: Value,
}

impl PublicTotals {
    fn totals(&self) -> YearTotals {
        YearTotals {
            total: to_count(&self.total),
            done: to_count(&self.done),
            ongoing_at_boundary: to_count(&self.ongoing_year_end),
            ongoing_now: to_count(&self.ongoing_now),
            sample: to_count(&self.cycle_sample),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicTeams {
    pub teams: LenientMap<PublicMetric>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicCycleTime {
    /// year -> effort scope -> teams
    pub by_year: LenientMap<LenientMap<PublicTeams>>,
    /// year -> effort scope -> totals
    pub totals_by_year: LenientMap<LenientMap<PublicTotals>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicPhaseTeams {
    /// team -> phase key -> cell
    pub teams: LenientMap<LenientMap<PublicMetric>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicLifecycle {
    pub by_year: LenientMap<PublicPhaseTeams>,
    pub totals_by_year: LenientMap<PublicTotals>,
}

/// Summary tables published in place of raw ideas
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicAggregates {
    #[serde(deserialize_with = "or_default")]
    pub cycle_time: PublicCycleTime,
    #[serde(deserialize_with = "or_default")]
    pub lifecycle_phase_days: PublicLifecycle,
}

impl PublicAggregates {
    /// Teams to display: the roster when configured, otherwise every team
    /// named in the tables, sorted, with `UNMAPPED` last
    pub fn teams(&self, roster: &TeamRoster) -> Vec<TeamBucket> {
        if !roster.is_empty() {
            return roster
                .teams()
                .iter()
                .cloned()
                .map(TeamBucket::Member)
                .collect();
        }

        let mut found: BTreeSet<&str> = BTreeSet::new();
        for scopes in self.cycle_time.by_year.values() {
            for node in scopes.values() {
                found.extend(node.teams.keys().map(String::as_str));
            }
        }
        for node in self.lifecycle_phase_days.by_year.values() {
            found.extend(node.teams.keys().map(String::as_str));
        }

        let has_unmapped = found.remove(UNMAPPED);
        let mut teams: Vec<TeamBucket> = found
            .into_iter()
            .filter(|team| !team.trim().is_empty())
            .map(|team| TeamBucket::Member(team.to_string()))
            .collect();
        if has_unmapped {
            teams.push(TeamBucket::Unmapped);
        }
        teams
    }

    /// Rebuild a cycle-time report for one effort scope
    pub fn cycle_time_report(
        &self,
        roster: &TeamRoster,
        scope: EffortScope,
        years: &[i32],
    ) -> CycleTimeReport {
        let teams = self.teams(roster);
        let years: Vec<CycleTimeYear> = years
            .iter()
            .map(|&year| {
                let key = year.to_string();
                let cells = self
                    .cycle_time
                    .by_year
                    .get(&key)
                    .and_then(|scopes| scopes.get(scope.key()));
                let totals = self
                    .cycle_time
                    .totals_by_year
                    .get(&key)
                    .and_then(|scopes| scopes.get(scope.key()))
                    .map(PublicTotals::totals)
                    .unwrap_or_default();

                CycleTimeYear {
                    year,
                    teams: teams
                        .iter()
                        .map(|team| TeamCycleStats {
                            team: team.clone(),
                            summary: cells
                                .and_then(|node| node.teams.get(team.name()))
                                .map(PublicMetric::summary)
                                .unwrap_or_default(),
                        })
                        .collect(),
                    totals,
                }
            })
            .collect();

        let coverage = published_coverage(&teams, &years, |entry| {
            (entry.year, entry.totals.sample)
        });
        CycleTimeReport {
            scope,
            years,
            coverage,
        }
    }

    /// Rebuild a lifecycle phase-days report
    pub fn lifecycle_report(
        &self,
        roster: &TeamRoster,
        phases: &PhaseSet,
        years: &[i32],
    ) -> LifecycleReport {
        let teams = self.teams(roster);
        let years: Vec<LifecycleYear> = years
            .iter()
            .map(|&year| {
                let key = year.to_string();
                let node = self.lifecycle_phase_days.by_year.get(&key);
                let totals = self
                    .lifecycle_phase_days
                    .totals_by_year
                    .get(&key)
                    .map(PublicTotals::totals)
                    .unwrap_or_default();

                LifecycleYear {
                    year,
                    teams: teams
                        .iter()
                        .map(|team| TeamPhaseStats {
                            team: team.clone(),
                            phases: phases
                                .phases()
                                .map(|phase| PhaseStats {
                                    phase,
                                    summary: node
                                        .and_then(|n| n.teams.get(team.name()))
                                        .and_then(|cells| cells.get(phase.key()))
                                        .map(PublicMetric::summary)
                                        .unwrap_or_default(),
                                })
                                .collect(),
                        })
                        .collect(),
                    totals,
                }
            })
            .collect();

        let coverage = published_coverage(&teams, &years, |entry| {
            (entry.year, entry.totals.sample)
        });
        LifecycleReport {
            phases: phases.defs().to_vec(),
            years,
            coverage,
        }
    }
}

/// Coverage of a rebuilt report; no teams means nothing was published
fn published_coverage<T>(
    teams: &[TeamBucket],
    years: &[T],
    sample: impl Fn(&T) -> (i32, usize),
) -> Coverage {
    if teams.is_empty() {
        return Coverage::NoIdeas;
    }
    Coverage::assess(teams.len(), years.iter().map(sample))
}
