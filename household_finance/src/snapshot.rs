//! Per-month output handed to display collaborators
//!
//! Charts, scoreboards and action feeds consume [`MonthSnapshot`]s through
//! [`SnapshotSink`]; nothing they do flows back into the simulation.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::household::Household;
use crate::policy::Action;

/// What a household did this month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionLabel {
    Chose(Action),
    Bankrupt,
}

impl ActionLabel {
    pub fn label(self) -> &'static str {
        match self {
            ActionLabel::Chose(action) => action.label(),
            ActionLabel::Bankrupt => "BANKRUPT",
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ActionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub name: String,
    pub color: String,
    pub net_worth: f64,
    pub stress: f64,
    pub alive: bool,
    pub action: ActionLabel,
}

impl AgentSnapshot {
    pub fn capture(household: &Household, action: ActionLabel) -> Self {
        AgentSnapshot {
            name: household.name.clone(),
            color: household.color.clone(),
            net_worth: household.net_worth(),
            stress: household.stress,
            alive: household.is_alive(),
            action,
        }
    }
}

/// Every household, in population order, after one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSnapshot {
    /// 1-based
    pub month: usize,
    pub entries: Vec<AgentSnapshot>,
}

impl MonthSnapshot {
    pub fn entry(&self, name: &str) -> Option<&AgentSnapshot> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn survivors(&self) -> usize {
        self.entries.iter().filter(|entry| entry.alive).count()
    }
}

/// Receiver of per-month output
pub trait SnapshotSink {
    fn on_month(&mut self, snapshot: &MonthSnapshot);
}

impl<F: FnMut(&MonthSnapshot)> SnapshotSink for F {
    fn on_month(&mut self, snapshot: &MonthSnapshot) {
        self(snapshot)
    }
}

/// Final state of one household
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdSummary {
    pub name: String,
    pub net_worth: f64,
    pub cash: f64,
    pub investments: f64,
    pub stress: f64,
    pub alive: bool,
    pub owns_business: bool,
    /// Month in which the household went bankrupt
    pub bankrupt_in: Option<usize>,
}

impl HouseholdSummary {
    pub fn capture(household: &Household, bankrupt_in: Option<usize>) -> Self {
        HouseholdSummary {
            name: household.name.clone(),
            net_worth: household.net_worth(),
            cash: household.cash,
            investments: household.investments,
            stress: household.stress,
            alive: household.is_alive(),
            owns_business: household.has_business(),
            bankrupt_in,
        }
    }
}

/// Observable state of a population run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationStats {
    pub months_completed: usize,
    pub households: Vec<HouseholdSummary>,
    pub history: Vec<MonthSnapshot>,
    /// Set when a month could not be completed and the run halted early
    pub failure: Option<String>,
}

impl PopulationStats {
    pub fn survivors(&self) -> usize {
        self.households.iter().filter(|h| h.alive).count()
    }

    /// Net worth of one household across the run
    pub fn net_worth_series(&self, name: &str) -> Vec<f64> {
        self.history
            .iter()
            .filter_map(|month| month.entry(name).map(|entry| entry.net_worth))
            .collect()
    }
}
