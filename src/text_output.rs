// Plain-text rendering of reports for the terminal
//
// Tables are fixed-width with day values shown to two decimals ("--" when a
// team has no sample). Each year ends with its totals line.

use crate::aggregate::{Coverage, CycleTimeReport, LifecycleReport, YearTotals};
use crate::backlog::{CompositionRow, Priority, UatAgingReport};
use crate::json_output::JsonIdeaPhases;
use crate::lifecycle::PhaseSet;
use crate::sprint_goals::SprintGoalPoint;
use crate::stats::{format_days, Metric};
use std::fmt::Write;

fn years_label(years: &[i32]) -> String {
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `YEAR: total T • done D • ongoing (year-end) B • ongoing now N • cycle sample S`
pub fn cycle_totals_line(year: i32, totals: &YearTotals) -> String {
    format!(
        "{}: total {} • done {} • ongoing (year-end) {} • ongoing now {} • cycle sample {}",
        year,
        totals.total,
        totals.done,
        totals.ongoing_at_boundary,
        totals.ongoing_now,
        totals.sample
    )
}

/// `YEAR: total T • done D • ongoing O • cycle sample S`
pub fn lifecycle_totals_line(year: i32, totals: &YearTotals) -> String {
    format!(
        "{}: total {} • done {} • ongoing {} • cycle sample {}",
        year, totals.total, totals.done, totals.ongoing_at_boundary, totals.sample
    )
}

/// Render a cycle-time report
pub fn render_cycle_time(report: &CycleTimeReport, metric: Metric) -> String {
    let years: Vec<i32> = report.years.iter().map(|y| y.year).collect();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cycle time from parking lot exit to done • scope {} • total ideas ({}): {}",
        report.scope,
        years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join("+"),
        report.total_ideas()
    );

    match &report.coverage {
        Coverage::NoIdeas => {
            out.push_str("No ideas found in dataset.\n");
            return out;
        }
        Coverage::NoSamples => {
            let _ = writeln!(
                out,
                "No completed Parking lot exit -> Done items found for {}.",
                years_label(&years)
            );
        }
        Coverage::Partial { .. } | Coverage::Complete => {}
    }

    for year in &report.years {
        out.push('\n');
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>10} {:>10} {:>10}",
            year.year,
            "n",
            "median",
            "average",
            metric.label()
        );
        let _ = writeln!(out, "{}", "-".repeat(64));
        for stats in &year.teams {
            let _ = writeln!(
                out,
                "{:<24} {:>6} {:>10} {:>10} {:>10}",
                stats.team.name(),
                stats.summary.n,
                format_days(stats.summary.median),
                format_days(stats.summary.average),
                format_days(stats.summary.metric(metric))
            );
        }
        let _ = writeln!(out, "{}", cycle_totals_line(year.year, &year.totals));
    }
    out
}

/// Render a lifecycle phase-days report, one table per year
pub fn render_lifecycle(report: &LifecycleReport, phases: &PhaseSet, metric: Metric) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Lifecycle phase time • {} days per phase", metric.label());

    if report.coverage == Coverage::NoIdeas {
        out.push_str("No ideas found in dataset.\n");
        return out;
    }

    for year in &report.years {
        out.push('\n');
        let active = year.active_phases();
        if active.is_empty() {
            let _ = writeln!(out, "No lifecycle phase time data found for {}.", year.year);
            let _ = writeln!(out, "{}", lifecycle_totals_line(year.year, &year.totals));
            continue;
        }

        let _ = write!(out, "{:<24}", year.year);
        for phase in &active {
            let _ = write!(out, " {:>16}", phases.label(*phase));
        }
        out.push('\n');
        let _ = writeln!(out, "{}", "-".repeat(24 + 17 * active.len()));

        for team in &year.teams {
            let _ = write!(out, "{:<24}", team.team.name());
            for phase in &active {
                let cell = team
                    .phase(*phase)
                    .map(|stats| format!("{} (n={})", format_days(stats.metric(metric)), stats.n))
                    .unwrap_or_else(|| format_days(None));
                let _ = write!(out, " {:>16}", cell);
            }
            out.push('\n');
        }
        let _ = writeln!(out, "{}", lifecycle_totals_line(year.year, &year.totals));
    }
    out
}

/// Render per-idea phase durations
pub fn render_idea_phases(rows: &[JsonIdeaPhases], phases: &PhaseSet) -> String {
    if rows.is_empty() {
        return "No ideas found in dataset.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(out, "{:<14} {:<16} {:>6} {:>10}", "idea", "team", "year", "cycle");
    for phase in phases.phases() {
        let _ = write!(out, " {:>14}", phases.label(phase));
    }
    out.push('\n');

    for row in rows {
        let year = row.year.map(|y| y.to_string()).unwrap_or_else(|| "--".to_string());
        let _ = write!(
            out,
            "{:<14} {:<16} {:>6} {:>10}",
            row.key,
            row.team.name(),
            year,
            format_days(row.cycle_time_days)
        );
        for phase in phases.phases() {
            let _ = write!(out, " {:>14}", format_days(Some(row.phases.get(phase))));
        }
        out.push('\n');
    }
    out
}

/// Render a team's sprint-goal series
pub fn render_sprint_goals(team: &str, series: &[SprintGoalPoint]) -> String {
    if series.is_empty() {
        return "No valid sprint rows found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Sprint goals • {}", team);
    let _ = writeln!(
        out,
        "{:<12} {:>6} {:>8} {:>8} {:>10}",
        "sprint", "label", "total", "passed", "success %"
    );
    for point in series {
        let _ = writeln!(
            out,
            "{:<12} {:>6} {:>8} {:>8} {:>10.1}",
            point.sprint_start, point.label, point.total, point.passed, point.success_rate_pct
        );
    }
    out
}

/// Render backlog composition and, when present, UAT aging
pub fn render_backlog(rows: &[CompositionRow], uat: Option<&UatAgingReport>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<12} {:<12}", "date", "team");
    for priority in Priority::ALL {
        let _ = write!(out, " {:>8}", priority.label());
    }
    let _ = writeln!(out, " {:>8}", "Total");
    for row in rows {
        let _ = write!(out, "{:<12} {:<12}", row.date, row.team);
        for priority in Priority::ALL {
            let _ = write!(out, " {:>8}", row.priorities.get(priority));
        }
        let _ = writeln!(out, " {:>8}", row.total);
    }

    out.push('\n');
    match uat {
        None => out.push_str("No UAT aging data found in snapshot.\n"),
        Some(report) => {
            let _ = writeln!(
                out,
                "{}, {} currently in UAT",
                report.scope_label, report.total_issues
            );
            for bucket in &report.buckets {
                let counts = bucket
                    .counts
                    .iter()
                    .map(|(priority, n)| format!("{} {}", priority.label(), n))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "{:<16} {:>6}  {}",
                    bucket.label, bucket.total, counts
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_cycle_time, aggregate_lifecycle_days};
    use crate::model::{Idea, LifecycleEvent};
    use crate::sprint_goals::{normalize_sprints, sprint_goal_series};
    use crate::team::{EffortScope, TeamRoster};

    fn ideas() -> Vec<Idea> {
        vec![
            Idea {
                key: "IDEA-1".to_string(),
                primary_team: Some("API".to_string()),
                entered_done: Some("2025-01-21".to_string()),
                lifecycle_events: vec![LifecycleEvent::new("parking_lot", "design", "2025-01-01")],
                ..Default::default()
            },
            Idea {
                key: "IDEA-2".to_string(),
                primary_team: Some("API".to_string()),
                entered_parking_lot: Some("2025-03-01".to_string()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_totals_line() {
        let totals = YearTotals {
            total: 5,
            done: 2,
            ongoing_at_boundary: 3,
            ongoing_now: 1,
            sample: 2,
        };
        assert_eq!(
            cycle_totals_line(2025, &totals),
            "2025: total 5 • done 2 • ongoing (year-end) 3 • ongoing now 1 • cycle sample 2"
        );
        assert_eq!(
            lifecycle_totals_line(2025, &totals),
            "2025: total 5 • done 2 • ongoing 3 • cycle sample 2"
        );
    }

    #[test]
    fn test_render_cycle_time() {
        let report = aggregate_cycle_time(
            &ideas(),
            &TeamRoster::new(["API", "Frontend"]),
            EffortScope::All,
            &[2025, 2026],
        );
        let text = render_cycle_time(&report, Metric::Median);
        assert!(text.contains("total ideas (2025+2026): 2"));
        assert!(text.contains("20.00"));
        assert!(text.contains("--"));
        assert!(text.contains("2025: total 2 • done 1 • ongoing (year-end) 1 • ongoing now 1 • cycle sample 1"));
    }

    #[test]
    fn test_render_cycle_time_without_samples() {
        let report = aggregate_cycle_time(
            &ideas()[1..],
            &TeamRoster::new(["API"]),
            EffortScope::All,
            &[2025],
        );
        let text = render_cycle_time(&report, Metric::Average);
        assert!(text.contains("No completed Parking lot exit -> Done items found for 2025."));

        let empty = aggregate_cycle_time(&[], &TeamRoster::new(["API"]), EffortScope::All, &[2025]);
        assert!(render_cycle_time(&empty, Metric::Median).contains("No ideas found"));
    }

    #[test]
    fn test_render_lifecycle() {
        let phases = PhaseSet::default();
        let report = aggregate_lifecycle_days(
            &ideas(),
            &TeamRoster::new(["API"]),
            &phases,
            &[2025, 2026],
        );
        let text = render_lifecycle(&report, &phases, Metric::Median);
        assert!(text.contains("Design"));
        assert!(text.contains("20.00 (n=1)"));
        assert!(!text.contains("In Development"));
        assert!(text.contains("No lifecycle phase time data found for 2026."));
    }

    #[test]
    fn test_render_sprint_goals() {
        let doc = serde_json::json!({ "sprints": [
            { "sprint_start": "2026-01-12", "teams": [{ "team": "API", "goals_total": 4, "goals_passed": 3 }] }
        ]});
        let series = sprint_goal_series(&normalize_sprints(&doc), "API", 6);
        let text = render_sprint_goals("API", &series);
        assert!(text.contains("01/12"));
        assert!(text.contains("75.0"));
        assert_eq!(render_sprint_goals("API", &[]), "No valid sprint rows found.\n");
    }
}
