//! CSV output format for aggregation reports
//!
//! One flat row per (year, team) or (year, team, phase) cell, for
//! spreadsheet analysis. Missing statistics are written as empty fields.

use crate::aggregate::{CycleTimeReport, LifecycleReport};
use crate::backlog::{CompositionRow, Priority};
use crate::json_output::JsonIdeaPhases;
use crate::lifecycle::PhaseSet;
use crate::sprint_goals::SprintGoalPoint;

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvOutput {
    /// Create a formatter with the given column names
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row of already formatted fields
    pub fn add_row(&mut self, fields: Vec<String>) {
        self.rows.push(fields);
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(fields: &[String]) -> String {
        fields
            .iter()
            .map(|field| Self::escape_field(field))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = Self::format_row(&self.header);
        output.push('\n');
        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }
        output
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// `year,team,n,median,average`
pub fn cycle_time_csv(report: &CycleTimeReport) -> String {
    let mut output = CsvOutput::new(["year", "team", "n", "median", "average"]);
    for year in &report.years {
        for stats in &year.teams {
            output.add_row(vec![
                year.year.to_string(),
                stats.team.to_string(),
                stats.summary.n.to_string(),
                optional(stats.summary.median),
                optional(stats.summary.average),
            ]);
        }
    }
    output.to_csv()
}

/// `year,team,phase,n,median,average`
pub fn lifecycle_csv(report: &LifecycleReport) -> String {
    let mut output = CsvOutput::new(["year", "team", "phase", "n", "median", "average"]);
    for year in &report.years {
        for team in &year.teams {
            for stats in &team.phases {
                output.add_row(vec![
                    year.year.to_string(),
                    team.team.to_string(),
                    stats.phase.key().to_string(),
                    stats.summary.n.to_string(),
                    optional(stats.summary.median),
                    optional(stats.summary.average),
                ]);
            }
        }
    }
    output.to_csv()
}

/// `key,team,year,cycle_time_days,<phase>...`
pub fn idea_phases_csv(rows: &[JsonIdeaPhases], phases: &PhaseSet) -> String {
    let mut header: Vec<String> = ["key", "team", "year", "cycle_time_days"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    header.extend(phases.phases().map(|p| p.key().to_string()));

    let mut output = CsvOutput::new(header);
    for row in rows {
        let mut fields = vec![
            row.key.clone(),
            row.team.to_string(),
            row.year.map(|y| y.to_string()).unwrap_or_default(),
            optional(row.cycle_time_days),
        ];
        fields.extend(phases.phases().map(|p| row.phases.get(p).to_string()));
        output.add_row(fields);
    }
    output.to_csv()
}

/// `sprint_start,total,passed,success_rate_pct`
pub fn sprint_goals_csv(series: &[SprintGoalPoint]) -> String {
    let mut output = CsvOutput::new(["sprint_start", "total", "passed", "success_rate_pct"]);
    for point in series {
        output.add_row(vec![
            point.sprint_start.clone(),
            point.total.to_string(),
            point.passed.to_string(),
            format!("{:.2}", point.success_rate_pct),
        ]);
    }
    output.to_csv()
}

/// `date,team,highest,high,medium,low,lowest,total`
pub fn composition_csv(rows: &[CompositionRow]) -> String {
    let mut header = vec!["date".to_string(), "team".to_string()];
    header.extend(Priority::ALL.iter().map(|p| p.key().to_string()));
    header.push("total".to_string());

    let mut output = CsvOutput::new(header);
    for row in rows {
        let mut fields = vec![row.date.clone(), row.team.clone()];
        fields.extend(Priority::ALL.iter().map(|p| row.priorities.get(*p).to_string()));
        fields.push(row.total.to_string());
        output.add_row(fields);
    }
    output.to_csv()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_cycle_time, aggregate_lifecycle_days};
    use crate::model::{Idea, LifecycleEvent};
    use crate::team::{EffortScope, TeamRoster};

    fn ideas() -> Vec<Idea> {
        vec![Idea {
            key: "IDEA-1".to_string(),
            primary_team: Some("API".to_string()),
            entered_done: Some("2025-01-21".to_string()),
            lifecycle_events: vec![LifecycleEvent::new("parking_lot", "design", "2025-01-01")],
            ..Default::default()
        }]
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(CsvOutput::escape_field("plain"), "plain");
        assert_eq!(CsvOutput::escape_field("a,b"), "\"a,b\"");
        assert_eq!(CsvOutput::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_cycle_time_rows() {
        let roster = TeamRoster::new(["API", "Design Ops, EU"]);
        let report = aggregate_cycle_time(&ideas(), &roster, EffortScope::All, &[2025]);
        let csv = cycle_time_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "year,team,n,median,average");
        assert_eq!(lines[1], "2025,API,1,20,20");
        // No samples: empty statistics, quoted team name
        assert_eq!(lines[2], "2025,\"Design Ops, EU\",0,,");
    }

    #[test]
    fn test_lifecycle_rows() {
        let report = aggregate_lifecycle_days(
            &ideas(),
            &TeamRoster::new(["API"]),
            &PhaseSet::default(),
            &[2025],
        );
        let csv = lifecycle_csv(&report);
        assert!(csv.starts_with("year,team,phase,n,median,average\n"));
        assert!(csv.contains("2025,API,design,1,20,20\n"));
        assert!(csv.contains("2025,API,parking_lot,0,,\n"));
        assert_eq!(csv.lines().count(), 1 + 5);
    }

    #[test]
    fn test_idea_phases_header() {
        let rows: Vec<JsonIdeaPhases> = ideas()
            .iter()
            .map(|idea| JsonIdeaPhases::from_idea(idea, &TeamRoster::new(["API"]), &PhaseSet::default()))
            .collect();
        let csv = idea_phases_csv(&rows, &PhaseSet::default());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("key,team,year,cycle_time_days,parking_lot,design,ready_for_development,in_development,feedback")
        );
        assert_eq!(lines.next(), Some("IDEA-1,API,2025,20,0,20,0,0,0"));
    }
}
