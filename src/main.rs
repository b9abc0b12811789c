use anyhow::{Context, Result};
use clap::Parser;
use ideaflow::backlog::{self, BacklogSnapshot};
use ideaflow::cli::{Cli, Command, OutputFormat};
use ideaflow::config::EngineConfig;
use ideaflow::dataset::Dataset;
use ideaflow::json_output::{JsonBacklog, JsonIdeaPhases, JsonOutput, JsonSprintGoals};
use ideaflow::stats::Metric;
use ideaflow::team::EffortScope;
use ideaflow::{csv_output, sprint_goals, text_output};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Built-in configuration unless a file is given
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_toml(path),
        None => EngineConfig::embedded().context("Built-in configuration is invalid"),
    }
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::from_path(path)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))
}

fn years_or_default(years: Vec<i32>, config: &EngineConfig) -> Vec<i32> {
    if years.is_empty() {
        config.compare_years.clone()
    } else {
        years
    }
}

fn run_cycle_time(
    config: &EngineConfig,
    format: OutputFormat,
    dataset: &Path,
    scope: EffortScope,
    metric: Metric,
    years: &[i32],
) -> Result<String> {
    let dataset = load_dataset(dataset)?;
    let report = dataset.cycle_time(&config.roster(), scope, years);
    Ok(match format {
        OutputFormat::Text => text_output::render_cycle_time(&report, metric),
        OutputFormat::Json => JsonOutput::new(report)
            .with_generated_at(dataset.generated_at)
            .to_json()?,
        OutputFormat::Csv => csv_output::cycle_time_csv(&report),
    })
}

fn run_lifecycle(
    config: &EngineConfig,
    format: OutputFormat,
    dataset: &Path,
    metric: Metric,
    years: &[i32],
) -> Result<String> {
    let dataset = load_dataset(dataset)?;
    let report = dataset.lifecycle(&config.roster(), &config.phases, years);
    Ok(match format {
        OutputFormat::Text => text_output::render_lifecycle(&report, &config.phases, metric),
        OutputFormat::Json => JsonOutput::new(report)
            .with_generated_at(dataset.generated_at)
            .to_json()?,
        OutputFormat::Csv => csv_output::lifecycle_csv(&report),
    })
}

fn run_phases(
    config: &EngineConfig,
    format: OutputFormat,
    dataset: &Path,
    idea: Option<&str>,
) -> Result<String> {
    let dataset = load_dataset(dataset)?;
    let roster = dataset.roster(&config.roster());
    let rows: Vec<JsonIdeaPhases> = dataset
        .ideas
        .iter()
        .filter(|candidate| idea.map_or(true, |key| candidate.key == key))
        .map(|candidate| JsonIdeaPhases::from_idea(candidate, &roster, &config.phases))
        .collect();

    if let (Some(key), true) = (idea, rows.is_empty()) {
        anyhow::bail!("Idea '{}' not found in dataset", key);
    }

    Ok(match format {
        OutputFormat::Text => text_output::render_idea_phases(&rows, &config.phases),
        OutputFormat::Json => JsonOutput::new(rows)
            .with_generated_at(dataset.generated_at)
            .to_json()?,
        OutputFormat::Csv => csv_output::idea_phases_csv(&rows, &config.phases),
    })
}

fn run_sprint_goals(
    config: &EngineConfig,
    format: OutputFormat,
    path: &Path,
    team: Option<&str>,
    lookback: Option<usize>,
) -> Result<String> {
    let lookback = lookback.unwrap_or(config.sprint_goals.lookback);
    if lookback < 1 {
        anyhow::bail!("Invalid value for --lookback: {} (must be >= 1)", lookback);
    }
    let team = sprint_goals::resolve_team(team, &config.sprint_goals.teams)
        .context("No sprint-goal teams configured")?;

    let sprints = sprint_goals::load_sprints(path)
        .with_context(|| format!("Failed to load sprint goals: {}", path.display()))?;
    let series = sprint_goals::sprint_goal_series(&sprints, team, lookback);

    Ok(match format {
        OutputFormat::Text => text_output::render_sprint_goals(team, &series),
        OutputFormat::Json => JsonOutput::new(JsonSprintGoals {
            team: team.to_string(),
            lookback,
            sprints: series,
        })
        .to_json()?,
        OutputFormat::Csv => csv_output::sprint_goals_csv(&series),
    })
}

fn run_backlog(
    config: &EngineConfig,
    format: OutputFormat,
    path: &Path,
    team: Option<&str>,
) -> Result<String> {
    let scope = team.unwrap_or(&config.backlog.default_scope);
    let teams = backlog::select_teams(&config.backlog.teams, scope);
    if teams.is_empty() {
        anyhow::bail!("Unknown backlog team '{}'", scope);
    }

    let snapshot = BacklogSnapshot::from_path(path)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
    let rows = backlog::composition(&snapshot.points, &teams);
    let uat = snapshot.uat_aging.as_ref().and_then(backlog::uat_aging);

    Ok(match format {
        OutputFormat::Text => text_output::render_backlog(&rows, uat.as_ref()),
        OutputFormat::Json => JsonOutput::new(JsonBacklog {
            scope: scope.to_string(),
            composition: rows,
            uat_aging: uat,
        })
        .with_generated_at(snapshot.updated_at)
        .to_json()?,
        OutputFormat::Csv => csv_output::composition_csv(&rows),
    })
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(args.config.as_deref())?;

    let output = match args.command {
        Command::CycleTime {
            dataset,
            scope,
            metric,
            years,
        } => run_cycle_time(
            &config,
            args.format,
            &dataset,
            scope.unwrap_or(config.effort_scope),
            metric.unwrap_or(config.metric),
            &years_or_default(years, &config),
        )?,
        Command::Lifecycle {
            dataset,
            metric,
            years,
        } => run_lifecycle(
            &config,
            args.format,
            &dataset,
            metric.unwrap_or(config.metric),
            &years_or_default(years, &config),
        )?,
        Command::Phases { dataset, idea } => {
            run_phases(&config, args.format, &dataset, idea.as_deref())?
        }
        Command::SprintGoals {
            sprints,
            team,
            lookback,
        } => run_sprint_goals(&config, args.format, &sprints, team.as_deref(), lookback)?,
        Command::Backlog { snapshot, team } => {
            run_backlog(&config, args.format, &snapshot, team.as_deref())?
        }
    };

    print!("{}", output);
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(())
}
