use crate::commands::{
    run_dashboard, run_performance, run_recommend, run_search, run_similar, run_subscription,
    EmployerArgs, RecommendArgs, SearchArgs, SimilarArgs, SubscriptionArgs,
};
use crate::infra::{build_service, load_snapshot};
use clap::{Args, Parser, Subcommand};
use gojobs::config::AppConfig;
use gojobs::error::AppError;
use gojobs::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "gojobs",
    about = "Rank jobs and inspect marketplace statistics from a GoJobs snapshot",
    version
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// Marketplace snapshot (JSON). Overrides GOJOBS_SNAPSHOT.
    #[arg(long, global = true)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Jobs CSV export merged into the snapshot before running the command
    #[arg(long, global = true)]
    pub(crate) jobs_csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend open jobs to a candidate
    Recommend(RecommendArgs),
    /// List open jobs similar to a reference job
    Similar(SimilarArgs),
    /// Search open jobs by text, category, city or contract type
    Search(SearchArgs),
    /// Employer statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommand,
    },
    /// Show the subscription status of a user
    Subscription(SubscriptionArgs),
}

#[derive(Subcommand, Debug)]
enum StatsCommand {
    /// Totals, conversion rate and top jobs for an employer
    Dashboard(EmployerArgs),
    /// Compare plain, urgent and featured listings of an employer
    Performance(EmployerArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let snapshot = load_snapshot(&config, cli.source)?;
    info!(
        ?config.environment,
        jobs = snapshot.jobs.len(),
        users = snapshot.users.len(),
        "marketplace snapshot loaded"
    );
    let service = build_service(&config, snapshot);

    match cli.command {
        Command::Recommend(args) => run_recommend(&service, args),
        Command::Similar(args) => run_similar(&service, args),
        Command::Search(args) => run_search(&service, args),
        Command::Stats {
            command: StatsCommand::Dashboard(args),
        } => run_dashboard(&service, args),
        Command::Stats {
            command: StatsCommand::Performance(args),
        } => run_performance(&service, args),
        Command::Subscription(args) => run_subscription(&service, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_source_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "gojobs",
            "similar",
            "--job",
            "10",
            "--snapshot",
            "data/snapshot.json",
        ])
        .expect("arguments parse");

        assert_eq!(
            cli.source.snapshot,
            Some(PathBuf::from("data/snapshot.json"))
        );
        match cli.command {
            Command::Similar(args) => {
                assert_eq!(args.job, 10);
                assert!(args.limit.is_none());
            }
            other => panic!("expected similar command, got {other:?}"),
        }
    }

    #[test]
    fn stats_subcommands_require_an_employer() {
        assert!(Cli::try_parse_from(["gojobs", "stats", "dashboard"]).is_err());
        let cli = Cli::try_parse_from(["gojobs", "stats", "performance", "--employer", "1"])
            .expect("arguments parse");
        assert!(matches!(
            cli.command,
            Command::Stats {
                command: StatsCommand::Performance(EmployerArgs { employer: 1, .. })
            }
        ));
    }
}
