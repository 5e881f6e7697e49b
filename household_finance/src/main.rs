//! Household Finance - command line host
//!
//! `run` plays one population month by month and prints an action feed;
//! `compare` replicates the run many times in parallel and compares profiles.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use household_finance::analysis::ProfileSummary;
use household_finance::{
    ModelParams, MonthSnapshot, PopulationStats, SimulationConfig, SnapshotSink,
};

#[derive(Parser, Debug)]
#[command(
    name = "household_finance",
    about = "Monthly financial life of autonomous households"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print the monthly feed
    Run {
        #[command(flatten)]
        setup: Setup,

        /// Emit one JSON snapshot per line instead of the text feed
        #[arg(long)]
        json: bool,
    },
    /// Replicate the simulation and compare personality profiles
    Compare {
        #[command(flatten)]
        setup: Setup,

        /// Number of independent replications
        #[arg(long, default_value_t = 100)]
        runs: usize,

        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct Setup {
    /// TOML config file; the built-in three-profile population when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the simulation horizon
    #[arg(long)]
    months: Option<usize>,

    /// Force a recession
    #[arg(long)]
    recession: bool,

    /// Use the harsher shock preset (more layoffs, larger expenses)
    #[arg(long)]
    volatile: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

impl Setup {
    fn load(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(months) = self.months {
            config.total_months = months;
        }
        if self.recession {
            config.recession = true;
        }
        if self.volatile {
            config.params.shocks = ModelParams::volatile().shocks;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the feed
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { setup, json } => run(&setup.load()?, json),
        Command::Compare {
            setup,
            runs,
            threads,
        } => compare(&setup.load()?, runs, threads),
    }
}

fn run(config: &SimulationConfig, json: bool) -> Result<()> {
    let sink: Box<dyn SnapshotSink> = if json {
        Box::new(|snapshot: &MonthSnapshot| match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::error!(%error, "failed to encode snapshot"),
        })
    } else {
        Box::new(print_feed_line)
    };

    let stats = household_finance::run_simulation(config, vec![sink])
        .context("Simulation failed to start")?;

    if let Some(failure) = &stats.failure {
        bail!("Simulation halted after {} months: {failure}", stats.months_completed);
    }
    if !json {
        print_scoreboard(&stats);
    }
    Ok(())
}

fn print_feed_line(snapshot: &MonthSnapshot) {
    let entries: Vec<String> = snapshot
        .entries
        .iter()
        .map(|entry| {
            format!(
                "{} {} ({:.0}, stress {:.0})",
                entry.name,
                entry.action,
                entry.net_worth,
                entry.stress.min(100.0)
            )
        })
        .collect();
    println!("Month {:>3} | {}", snapshot.month, entries.join(" | "));
}

fn print_scoreboard(stats: &PopulationStats) {
    println!("\n=== Final Scoreboard (month {}) ===", stats.months_completed);
    println!(
        "{:<16} {:>12} {:>10} {:>12} {:>8} {:>9}  status",
        "household", "net worth", "cash", "investments", "stress", "business"
    );
    for household in &stats.households {
        let status = match household.bankrupt_in {
            Some(month) => format!("bankrupt in month {month}"),
            None => "solvent".to_string(),
        };
        println!(
            "{:<16} {:>12.2} {:>10.2} {:>12.2} {:>8.1} {:>9}  {}",
            household.name,
            household.net_worth,
            household.cash,
            household.investments,
            household.stress,
            if household.owns_business { "yes" } else { "no" },
            status
        );
    }
}

fn compare(config: &SimulationConfig, runs: usize, threads: Option<usize>) -> Result<()> {
    if runs == 0 {
        bail!("--runs must be at least 1");
    }
    let base_seed = config.seed.unwrap_or(0);
    tracing::info!(runs, months = config.total_months, base_seed, "comparing profiles");

    let profiles = household_finance::compare_profiles(config, runs, base_seed, threads)
        .context("Comparison failed")?;
    print_profiles(&profiles, config);
    Ok(())
}

fn print_profiles(profiles: &[ProfileSummary], config: &SimulationConfig) {
    println!(
        "\n=== Profile Comparison ({} months, recession: {}) ===",
        config.total_months, config.recession
    );
    println!(
        "{:<16} {:>6} {:>9} {:>12} {:>12} {:>12} {:>8} {:>9} {:>14}",
        "profile",
        "runs",
        "survival",
        "mean NW",
        "min NW",
        "max NW",
        "stress",
        "business",
        "bankrupt month"
    );
    for profile in profiles {
        println!(
            "{:<16} {:>6} {:>8.1}% {:>12.2} {:>12.2} {:>12.2} {:>8.1} {:>8.1}% {:>14}",
            profile.name,
            profile.runs,
            profile.survival_rate * 100.0,
            profile.mean_net_worth,
            profile.min_net_worth,
            profile.max_net_worth,
            profile.mean_stress,
            profile.business_rate * 100.0,
            profile
                .mean_bankruptcy_month
                .map(|m| format!("{m:.1}"))
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(args: &[&str]) -> Setup {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Run { setup, .. } | Command::Compare { setup, .. } => setup,
        }
    }

    #[test]
    fn volatile_flag_swaps_shocks_only() {
        let config = setup(&["household_finance", "run", "--volatile", "--months", "12"])
            .load()
            .unwrap();

        assert_eq!(config.total_months, 12);
        assert_eq!(config.params.shocks, ModelParams::volatile().shocks);
        assert_eq!(config.params.policy, ModelParams::default().policy);
    }

    #[test]
    fn defaults_without_flags() {
        let config = setup(&["household_finance", "compare"]).load().unwrap();

        assert_eq!(config, SimulationConfig::default());
    }
}
