use des::{Agent, Response};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{Economy, SimulationConfig};
use crate::error::SimulationError;
use crate::household::Household;
use crate::params::ModelParams;
use crate::random::UniformSource;
use crate::snapshot::{
    ActionLabel, AgentSnapshot, HouseholdSummary, MonthSnapshot, PopulationStats, SnapshotSink,
};
use crate::tick::tick;
use crate::{Event, Stats};

/// Drives every household through the simulation horizon, one month at a time
///
/// Households never interact; within a month they are advanced strictly in
/// population order from one shared random source. Bankrupt households are
/// skipped but keep appearing in every snapshot with a `BANKRUPT` label.
pub struct Population<R: UniformSource> {
    households: Vec<Household>,
    bankrupt_in: Vec<Option<usize>>,
    economy: Economy,
    params: ModelParams,
    total_months: usize,
    month: usize,
    rng: R,
    history: Vec<MonthSnapshot>,
    sinks: Vec<Box<dyn SnapshotSink>>,
    failure: Option<String>,
}

impl Population<StdRng> {
    /// Build the population described by `config`, seeded from its `seed`
    /// or from the OS when none is given
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Population::with_rng(config, rng)
    }
}

impl<R: UniformSource> Population<R> {
    pub fn with_rng(config: &SimulationConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;
        Population::new(
            config.households(),
            config.economy(),
            config.params.clone(),
            config.total_months,
            rng,
        )
    }

    /// Households whose fixed costs sum to zero are rejected
    pub fn new(
        households: Vec<Household>,
        economy: Economy,
        params: ModelParams,
        total_months: usize,
        rng: R,
    ) -> Result<Self, SimulationError> {
        if let Some(household) = households.iter().find(|h| h.monthly_costs() == 0.0) {
            return Err(SimulationError::ZeroMonthlyCosts {
                name: household.name.clone(),
            });
        }

        let bankrupt_in = vec![None; households.len()];
        Ok(Population {
            households,
            bankrupt_in,
            economy,
            params,
            total_months,
            month: 0,
            rng,
            history: Vec::new(),
            sinks: Vec::new(),
            failure: None,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn SnapshotSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    /// Months completed so far
    pub fn month(&self) -> usize {
        self.month
    }

    pub fn total_months(&self) -> usize {
        self.total_months
    }

    pub fn is_finished(&self) -> bool {
        self.month >= self.total_months || self.failure.is_some()
    }

    pub fn history(&self) -> &[MonthSnapshot] {
        &self.history
    }

    /// Event that starts the run under the event loop
    pub fn initial_events(&self) -> Vec<(usize, Event)> {
        vec![(self.month + 1, Event::MonthStart { month: self.month + 1 })]
    }

    /// Advance every living household by one month and publish the snapshot
    ///
    /// A month either completes for the whole population or leaves every
    /// household untouched.
    pub fn step_month(&mut self) -> Result<MonthSnapshot, SimulationError> {
        if let Some(household) = self
            .households
            .iter()
            .find(|h| h.is_alive() && h.monthly_costs() == 0.0)
        {
            return Err(SimulationError::ZeroMonthlyCosts {
                name: household.name.clone(),
            });
        }

        let month = self.month + 1;
        let mut entries = Vec::with_capacity(self.households.len());

        for (household, bankrupt_in) in self.households.iter_mut().zip(&mut self.bankrupt_in) {
            let label = if household.is_alive() {
                let action = tick(household, self.economy, &self.params, &mut self.rng)?;
                if !household.is_alive() {
                    *bankrupt_in = Some(month);
                }
                ActionLabel::Chose(action)
            } else {
                ActionLabel::Bankrupt
            };
            entries.push(AgentSnapshot::capture(household, label));
        }

        self.month = month;
        let snapshot = MonthSnapshot { month, entries };
        for sink in &mut self.sinks {
            sink.on_month(&snapshot);
        }
        self.history.push(snapshot.clone());

        tracing::debug!(
            month,
            survivors = snapshot.survivors(),
            population = self.households.len(),
            "month complete"
        );
        Ok(snapshot)
    }

    /// Step until the horizon without an event loop
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while !self.is_finished() {
            self.step_month()?;
        }
        Ok(())
    }

    pub fn summary(&self) -> PopulationStats {
        PopulationStats {
            months_completed: self.month,
            households: self
                .households
                .iter()
                .zip(&self.bankrupt_in)
                .map(|(household, bankrupt_in)| HouseholdSummary::capture(household, *bankrupt_in))
                .collect(),
            history: self.history.clone(),
            failure: self.failure.clone(),
        }
    }
}

impl<R: UniformSource> Agent<Event, Stats> for Population<R> {
    fn act(&mut self, current_t: usize, data: &Event) -> Response<Event, Stats> {
        match data {
            Event::MonthStart { month } => {
                if self.is_finished() || *month != self.month + 1 {
                    return Response::new();
                }
                match self.step_month() {
                    Ok(_) if !self.is_finished() => Response::event(
                        current_t + 1,
                        Event::MonthStart {
                            month: self.month + 1,
                        },
                    ),
                    Ok(_) => {
                        tracing::info!(
                            months = self.month,
                            survivors = self.households.iter().filter(|h| h.is_alive()).count(),
                            "simulation finished"
                        );
                        Response::new()
                    }
                    Err(error) => {
                        tracing::error!(month, %error, "month failed, halting simulation");
                        self.failure = Some(error.to_string());
                        Response::new()
                    }
                }
            }
        }
    }

    fn stats(&self) -> Stats {
        Stats::Population(self.summary())
    }
}
