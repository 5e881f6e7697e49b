//! Comparison of personality profiles across replicated runs

use serde::Serialize;

use crate::snapshot::PopulationStats;

/// Outcome of one profile aggregated over many runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub runs: usize,
    pub survival_rate: f64,
    pub mean_net_worth: f64,
    pub min_net_worth: f64,
    pub max_net_worth: f64,
    pub mean_stress: f64,
    pub business_rate: f64,
    /// Average month of bankruptcy among the runs where it went bankrupt
    pub mean_bankruptcy_month: Option<f64>,
}

impl ProfileSummary {
    /// One summary per household name, in the population order of the first run
    pub fn from_runs(runs: &[PopulationStats]) -> Vec<ProfileSummary> {
        let Some(first) = runs.first() else {
            return Vec::new();
        };

        first
            .households
            .iter()
            .map(|household| Self::for_profile(&household.name, runs))
            .collect()
    }

    fn for_profile(name: &str, runs: &[PopulationStats]) -> ProfileSummary {
        let outcomes: Vec<_> = runs
            .iter()
            .filter_map(|run| run.households.iter().find(|h| h.name == name))
            .collect();
        let n = outcomes.len().max(1) as f64;

        let net_worths: Vec<f64> = outcomes.iter().map(|h| h.net_worth).collect();
        let bankruptcy_months: Vec<f64> = outcomes
            .iter()
            .filter_map(|h| h.bankrupt_in)
            .map(|month| month as f64)
            .collect();

        ProfileSummary {
            name: name.to_string(),
            runs: outcomes.len(),
            survival_rate: outcomes.iter().filter(|h| h.alive).count() as f64 / n,
            mean_net_worth: mean(&net_worths),
            min_net_worth: net_worths.iter().cloned().fold(f64::INFINITY, f64::min),
            max_net_worth: net_worths
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max),
            mean_stress: outcomes.iter().map(|h| h.stress).sum::<f64>() / n,
            business_rate: outcomes.iter().filter(|h| h.owns_business).count() as f64 / n,
            mean_bankruptcy_month: if bankruptcy_months.is_empty() {
                None
            } else {
                Some(mean(&bankruptcy_months))
            },
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::HouseholdSummary;
    use approx::assert_relative_eq;

    fn summary(name: &str, net_worth: f64, alive: bool, bankrupt_in: Option<usize>) -> HouseholdSummary {
        HouseholdSummary {
            name: name.to_string(),
            net_worth,
            cash: net_worth,
            investments: 0.0,
            stress: if alive { 0.0 } else { 30.0 },
            alive,
            owns_business: net_worth > 10_000.0,
            bankrupt_in,
        }
    }

    fn run(households: Vec<HouseholdSummary>) -> PopulationStats {
        PopulationStats {
            months_completed: 60,
            households,
            history: Vec::new(),
            failure: None,
        }
    }

    #[test]
    fn aggregates_per_profile_in_population_order() {
        let runs = vec![
            run(vec![
                summary("Cautious", 9000.0, true, None),
                summary("Gambler", 20_000.0, true, None),
            ]),
            run(vec![
                summary("Cautious", 11_000.0, true, None),
                summary("Gambler", -500.0, false, Some(14)),
            ]),
        ];

        let profiles = ProfileSummary::from_runs(&runs);

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Cautious");
        assert_relative_eq!(profiles[0].survival_rate, 1.0);
        assert_relative_eq!(profiles[0].mean_net_worth, 10_000.0);
        assert_eq!(profiles[0].mean_bankruptcy_month, None);

        assert_eq!(profiles[1].name, "Gambler");
        assert_eq!(profiles[1].runs, 2);
        assert_relative_eq!(profiles[1].survival_rate, 0.5);
        assert_relative_eq!(profiles[1].min_net_worth, -500.0);
        assert_relative_eq!(profiles[1].max_net_worth, 20_000.0);
        assert_relative_eq!(profiles[1].mean_stress, 15.0);
        assert_relative_eq!(profiles[1].business_rate, 0.5);
        assert_eq!(profiles[1].mean_bankruptcy_month, Some(14.0));
    }

    #[test]
    fn no_runs_no_profiles() {
        assert!(ProfileSummary::from_runs(&[]).is_empty());
    }
}
