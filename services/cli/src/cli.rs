use crate::demo::{self, DemoReport};
use clap::{Args, Parser, Subcommand};
use perf_metrics::config::AppConfig;
use perf_metrics::error::AppError;
use perf_metrics::metrics::{
    GroupId, IdentityId, PerformanceMetricsService, PeriodId, SnapshotSource,
};
use perf_metrics::telemetry;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "perf-metrics",
    about = "Composite scores, trends, outliers and goal statistics from evaluation records",
    version
)]
struct Cli {
    /// JSON snapshot of identities, periods, evaluations and goals (defaults to built-in demo data)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Weighted composite score for one subject in one period
    Score(ScoreArgs),
    /// Period-over-period score trend for one subject, most recent first
    Trend(TrendArgs),
    /// Group members whose score deviates from the group mean in the latest closed period
    Outliers(GroupArgs),
    /// Goal progress and completion for one subject in one period
    Goals(SubjectPeriodArgs),
    /// Group average and top performers for the latest closed period
    Summary(GroupArgs),
    /// Run every report against the loaded snapshot
    Demo,
}

#[derive(Args, Debug)]
struct SubjectPeriodArgs {
    /// Subject identity id
    #[arg(long)]
    subject: u64,
    /// Period id
    #[arg(long)]
    period: u64,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[command(flatten)]
    target: SubjectPeriodArgs,
    /// Include per-kind means and normalized weights
    #[arg(long)]
    breakdown: bool,
}

#[derive(Args, Debug)]
struct TrendArgs {
    /// Subject identity id
    #[arg(long)]
    subject: u64,
    /// Number of scored periods to report (defaults to PERF_TREND_PERIODS)
    #[arg(long)]
    periods: Option<usize>,
}

#[derive(Args, Debug)]
struct GroupArgs {
    /// Group (department) name
    #[arg(long)]
    group: String,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = match &cli.snapshot {
        Some(path) => SnapshotSource::from_path(path)?,
        None => demo::snapshot_source()?,
    };
    info!(
        ?config.environment,
        snapshot = ?cli.snapshot,
        identities = source.snapshot().identities.len(),
        periods = source.snapshot().periods.len(),
        "loaded evaluation snapshot"
    );

    let service = PerformanceMetricsService::new(Arc::new(source), config.scoring);
    execute(&service, cli.command)
}

fn execute(
    service: &PerformanceMetricsService<SnapshotSource>,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::Score(ScoreArgs { target, breakdown }) => {
            let subject = IdentityId(target.subject);
            let period = PeriodId(target.period);
            if breakdown {
                print_json(&service.score_breakdown(subject, period)?)
            } else {
                print_json(&service.composite_score(subject, period)?)
            }
        }
        Command::Trend(TrendArgs { subject, periods }) => {
            let subject = IdentityId(subject);
            let trend = match periods {
                Some(periods) => service.trend(subject, periods)?,
                None => service.recent_trend(subject)?,
            };
            print_json(&trend)
        }
        Command::Outliers(GroupArgs { group }) => {
            print_json(&service.outliers(&GroupId::new(group))?)
        }
        Command::Goals(SubjectPeriodArgs { subject, period }) => print_json(
            &service.goal_achievement(IdentityId(subject), PeriodId(period))?,
        ),
        Command::Summary(GroupArgs { group }) => {
            print_json(&service.group_summary(&GroupId::new(group))?)
        }
        Command::Demo => {
            let report: DemoReport = demo::run_demo(service)?;
            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
