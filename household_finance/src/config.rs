//! Simulation setup: population profiles, economy and horizon
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! total_months = 60
//! recession = true
//! seed = 7
//!
//! [params.shocks]
//! unexpected_expense_amount = 2500.0
//!
//! [[profiles]]
//! name = "Cautious"
//! risk_tolerance = 0.2
//! discipline = 0.9
//! intelligence = 0.6
//! color = "#2ca02c"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::household::{Household, Traits};
use crate::params::ModelParams;

/// State of the wider economy, shared read-only by every household
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub recession: bool,
}

impl Economy {
    pub fn recession() -> Self {
        Economy { recession: true }
    }
}

/// One member of the initial population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub risk_tolerance: f64,
    pub discipline: f64,
    pub intelligence: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub side_hustle: bool,
}

fn default_color() -> String {
    "#7f7f7f".to_string()
}

impl AgentProfile {
    pub fn new(
        name: &str,
        risk_tolerance: f64,
        discipline: f64,
        intelligence: f64,
        color: &str,
    ) -> Self {
        AgentProfile {
            name: name.to_string(),
            risk_tolerance,
            discipline,
            intelligence,
            color: color.to_string(),
            side_hustle: false,
        }
    }

    pub fn traits(&self) -> Traits {
        Traits {
            risk_tolerance: self.risk_tolerance,
            discipline: self.discipline,
            intelligence: self.intelligence,
        }
    }

    pub fn to_household(&self, params: &ModelParams) -> Household {
        Household::new(&self.name, &self.color, self.traits(), &params.household)
            .with_side_hustle(self.side_hustle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub total_months: usize,
    #[serde(default)]
    pub recession: bool,
    /// Fixed seed for a reproducible run; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub params: ModelParams,
    pub profiles: Vec<AgentProfile>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            total_months: 60,
            recession: false,
            seed: None,
            params: ModelParams::default(),
            profiles: vec![
                AgentProfile::new("Cautious", 0.2, 0.9, 0.6, "#2ca02c"),
                AgentProfile::new("Balanced", 0.5, 0.5, 0.5, "#1f77b4"),
                AgentProfile::new("Gambler", 0.9, 0.2, 0.4, "#d62728"),
            ],
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn economy(&self) -> Economy {
        Economy {
            recession: self.recession,
        }
    }

    pub fn households(&self) -> Vec<Household> {
        self.profiles
            .iter()
            .map(|profile| profile.to_household(&self.params))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_months == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.profiles.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }

        let mut names = HashSet::new();
        for profile in &self.profiles {
            if !names.insert(profile.name.as_str()) {
                return Err(ConfigError::DuplicateName(profile.name.clone()));
            }
            for (trait_name, value) in [
                ("risk_tolerance", profile.risk_tolerance),
                ("discipline", profile.discipline),
                ("intelligence", profile.intelligence),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::TraitOutOfRange {
                        name: profile.name.clone(),
                        trait_name,
                        value,
                    });
                }
            }
        }

        validate_params(&self.params)
    }
}

fn validate_params(params: &ModelParams) -> Result<(), ConfigError> {
    if let Some((field, value)) = params.values().into_iter().find(|(_, v)| !v.is_finite()) {
        return Err(ConfigError::NonFinite { field, value });
    }

    let household = &params.household;
    for (field, value) in [
        ("rent", household.rent),
        ("food", household.food),
        ("other_expenses", household.other_expenses),
    ] {
        // NaN fails this check too
        if !(value > 0.0) {
            return Err(ConfigError::NonPositiveCost { field, value });
        }
    }

    if !(household.side_hustle_min < household.side_hustle_max) {
        return Err(ConfigError::InvalidRange {
            field: "side_hustle",
            low: household.side_hustle_min,
            high: household.side_hustle_max,
        });
    }
    let half_width = params.actions.return_half_width;
    if !(half_width > 0.0) {
        return Err(ConfigError::InvalidRange {
            field: "investment_return",
            low: -half_width,
            high: half_width,
        });
    }

    let shocks = &params.shocks;
    for (field, value) in [
        ("recession_job_loss", shocks.recession_job_loss),
        ("job_loss", shocks.job_loss),
        ("unexpected_expense", shocks.unexpected_expense),
        ("invest_fraction", params.actions.invest_fraction),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidProbability { field, value });
        }
    }

    Ok(())
}
