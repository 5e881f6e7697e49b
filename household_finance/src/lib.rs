//! Household Finance ABM
//!
//! Simulates the monthly financial life of a small population of independent
//! households. Each month a household earns, pays its fixed costs, may be hit
//! by a random shock, then picks one action by scoring:
//! - save: do nothing, build the emergency runway
//! - invest: move a fifth of cash into a volatile portfolio
//! - start_business: pay once for a fixed monthly revenue
//! - job_search: get back into work
//!
//! Personality traits (risk tolerance, discipline) weight the scores, so
//! populations of different profiles diverge in net worth and stress.
//! Cash below zero at month end is a permanent bankruptcy.

pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod executor;
pub mod household;
pub mod params;
pub mod policy;
pub mod population;
pub mod random;
pub mod snapshot;
pub mod tick;

pub use config::{AgentProfile, Economy, SimulationConfig};
pub use error::{ConfigError, SimulationError};
pub use household::{Business, Household, Traits};
pub use params::ModelParams;
pub use policy::Action;
pub use population::Population;
pub use random::{SequenceSource, UniformSource};
pub use snapshot::{ActionLabel, MonthSnapshot, PopulationStats, SnapshotSink};

use des::parallel::{ParallelRunner, ScenarioResult};
use des::{Agent, EventLoop};
use rand::SeedableRng;
use rand::rngs::StdRng;

use analysis::ProfileSummary;

/// Events in the household finance simulation
#[derive(Debug, Clone)]
pub enum Event {
    /// Advance every living household by one month
    MonthStart { month: usize },
}

/// Stats enum for DES framework compatibility
#[derive(Debug, Clone)]
pub enum Stats {
    Population(PopulationStats),
}

/// Build the event loop for one run of `config`
pub fn build_event_loop(
    config: &SimulationConfig,
    sinks: Vec<Box<dyn SnapshotSink>>,
) -> Result<EventLoop<Event, Stats>, SimulationError> {
    let population = sinks
        .into_iter()
        .fold(Population::from_config(config)?, |population, sink| {
            population.with_sink(sink)
        });
    let initial_events = population.initial_events();
    let agents: Vec<Box<dyn Agent<Event, Stats>>> = vec![Box::new(population)];
    Ok(EventLoop::new(initial_events, agents))
}

/// Event loop for one replication of `config` seeded with `seed`
pub fn seeded_event_loop(
    config: &SimulationConfig,
    seed: u64,
) -> Result<EventLoop<Event, Stats>, SimulationError> {
    let population = Population::with_rng(config, StdRng::seed_from_u64(seed))?;
    let initial_events = population.initial_events();
    let agents: Vec<Box<dyn Agent<Event, Stats>>> = vec![Box::new(population)];
    Ok(EventLoop::new(initial_events, agents))
}

/// Run `config` to its horizon under the event loop
pub fn run_simulation(
    config: &SimulationConfig,
    sinks: Vec<Box<dyn SnapshotSink>>,
) -> Result<PopulationStats, SimulationError> {
    let mut event_loop = build_event_loop(config, sinks)?;
    event_loop.run(config.total_months);
    Ok(population_stats(event_loop.stats()))
}

/// Pull the population stats out of an event loop's stats
pub fn population_stats(stats: Vec<Stats>) -> PopulationStats {
    stats
        .into_iter()
        .map(|Stats::Population(population)| population)
        .next()
        .unwrap_or_else(|| PopulationStats {
            months_completed: 0,
            households: Vec::new(),
            history: Vec::new(),
            failure: Some("no population in event loop".to_string()),
        })
}

/// Run `runs` replications in parallel (seeds `base_seed + i`, wrapping) and
/// summarise each profile across them
///
/// Fails unless every replication reaches the horizon.
pub fn compare_profiles(
    config: &SimulationConfig,
    runs: usize,
    base_seed: u64,
    num_threads: Option<usize>,
) -> Result<Vec<ProfileSummary>, SimulationError> {
    config.validate()?;

    let mut runner = ParallelRunner::new(runs, |scenario| {
        let seed = base_seed.wrapping_add(scenario as u64);
        seeded_event_loop(config, seed).unwrap_or_else(|error| {
            tracing::error!(scenario, %error, "could not build replication");
            // No agents: reported as a failed replication below
            EventLoop::new(Vec::new(), Vec::new())
        })
    })
    .progress(des::parallel::tracing_progress_reporter((runs / 10).max(1)));
    if let Some(n) = num_threads {
        runner = runner.num_threads(n);
    }

    let completed = completed_replications(runs, runner.run(config.total_months)?)?;
    Ok(ProfileSummary::from_runs(&completed))
}

/// Keep the replications that reached the horizon, failing if any did not
pub fn completed_replications(
    requested: usize,
    results: Vec<ScenarioResult<Stats>>,
) -> Result<Vec<PopulationStats>, SimulationError> {
    let completed: Vec<PopulationStats> = results
        .into_iter()
        .enumerate()
        .filter_map(|(scenario, result)| match result.map(population_stats) {
            Ok(stats) if stats.failure.is_none() => Some(stats),
            Ok(stats) => {
                let failure = stats.failure.unwrap_or_default();
                tracing::error!(scenario, %failure, "replication halted");
                None
            }
            Err(error) => {
                tracing::error!(scenario, %error, "replication failed");
                None
            }
        })
        .collect();

    tracing::info!(requested, completed = completed.len(), "comparison finished");
    if completed.len() < requested {
        return Err(SimulationError::IncompleteComparison {
            requested,
            completed: completed.len(),
        });
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use des::parallel::ParallelError;

    #[test]
    fn run_simulation_reaches_horizon() {
        let config = SimulationConfig {
            total_months: 12,
            seed: Some(3),
            ..SimulationConfig::default()
        };

        let stats = run_simulation(&config, Vec::new()).unwrap();

        assert_eq!(stats.months_completed, 12);
        assert_eq!(stats.history.len(), 12);
        assert_eq!(stats.households.len(), 3);
        assert!(stats.failure.is_none());
    }

    #[test]
    fn compare_profiles_is_reproducible() {
        let config = SimulationConfig {
            total_months: 24,
            ..SimulationConfig::default()
        };

        let first = compare_profiles(&config, 8, 100, Some(2)).unwrap();
        let second = compare_profiles(&config, 8, 100, None).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|profile| profile.runs == 8));
    }

    #[test]
    fn seeded_loop_matches_seeded_config() {
        let config = SimulationConfig {
            total_months: 18,
            seed: Some(5),
            ..SimulationConfig::default()
        };

        let mut event_loop = seeded_event_loop(&config, 5).unwrap();
        event_loop.run(config.total_months);

        assert_eq!(
            population_stats(event_loop.stats()),
            run_simulation(&config, Vec::new()).unwrap()
        );
    }

    #[test]
    fn compare_profiles_wraps_large_seeds() {
        let config = SimulationConfig {
            total_months: 6,
            ..SimulationConfig::default()
        };

        let profiles = compare_profiles(&config, 4, u64::MAX, Some(1)).unwrap();

        assert_eq!(profiles.len(), 3);
        assert!(profiles.iter().all(|profile| profile.runs == 4));
    }

    #[test]
    fn lost_replications_fail_the_comparison() {
        let config = SimulationConfig {
            total_months: 6,
            ..SimulationConfig::default()
        };
        let mut event_loop = seeded_event_loop(&config, 1).unwrap();
        event_loop.run(config.total_months);

        let results: Vec<ScenarioResult<Stats>> = vec![
            Ok(event_loop.stats()),
            Err(ParallelError::Panicked {
                scenario: 1,
                message: "boom".to_string(),
            }),
            Ok(Vec::new()),
        ];

        match completed_replications(3, results) {
            Err(SimulationError::IncompleteComparison {
                requested,
                completed,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(completed, 1);
            }
            other => panic!("expected IncompleteComparison, got {other:?}"),
        }
    }

    #[test]
    fn empty_stats_report_failure() {
        let stats = population_stats(Vec::new());
        assert!(stats.failure.is_some());
    }
}
