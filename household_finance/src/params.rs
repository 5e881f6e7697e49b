use serde::{Deserialize, Serialize};

/// Starting balance sheet and fixed monthly outgoings for every household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdParams {
    pub starting_cash: f64,
    pub salary: f64,
    pub rent: f64,
    pub food: f64,
    pub other_expenses: f64,
    /// Side hustle income is drawn uniformly from [min, max)
    pub side_hustle_min: f64,
    pub side_hustle_max: f64,
}

impl Default for HouseholdParams {
    fn default() -> Self {
        HouseholdParams {
            starting_cash: 5000.0,
            salary: 2000.0,
            rent: 800.0,
            food: 400.0,
            other_expenses: 300.0,
            side_hustle_min: 300.0,
            side_hustle_max: 700.0,
        }
    }
}

/// Probability bands of the monthly shock draw
///
/// A single uniform draw is compared against the bands in priority order:
/// recession job loss, ordinary job loss, unexpected expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockParams {
    pub recession_job_loss: f64,
    pub job_loss: f64,
    pub unexpected_expense: f64,
    pub unexpected_expense_amount: f64,
    pub job_loss_stress: f64,
}

impl Default for ShockParams {
    fn default() -> Self {
        ShockParams {
            recession_job_loss: 0.08,
            job_loss: 0.03,
            unexpected_expense: 0.06,
            unexpected_expense_amount: 2000.0,
            job_loss_stress: 20.0,
        }
    }
}

/// Weights of the action scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyParams {
    /// Emergency runway (in months) the saver aims for
    pub savings_target_months: f64,
    pub save_shortfall_weight: f64,
    pub save_discipline_weight: f64,
    pub save_risk_penalty: f64,
    pub invest_runway_weight: f64,
    pub invest_discipline_weight: f64,
    pub business_risk_weight: f64,
    pub job_search_score: f64,
    /// Score assigned to actions that are not available this month
    pub forbidden_score: f64,
    /// Jitter is `(U - 0.5) * jitter_amplitude`
    pub jitter_amplitude: f64,
}

impl Default for PolicyParams {
    fn default() -> Self {
        PolicyParams {
            savings_target_months: 3.0,
            save_shortfall_weight: 20.0,
            save_discipline_weight: 10.0,
            save_risk_penalty: 5.0,
            invest_runway_weight: 5.0,
            invest_discipline_weight: 10.0,
            business_risk_weight: 30.0,
            job_search_score: 100.0,
            forbidden_score: -100.0,
            jitter_amplitude: 5.0,
        }
    }
}

/// Financial effect of the actions and the monthly market/stress dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionParams {
    /// Share of cash moved into investments by `invest`
    pub invest_fraction: f64,
    pub business_cost: f64,
    /// Cash must exceed this before a business can be started
    pub business_cash_threshold: f64,
    pub business_revenue: f64,
    /// Monthly return is uniform in [-half_width, +half_width)
    pub return_half_width: f64,
    /// Added when month-end cash is below rent
    pub stress_penalty: f64,
    pub stress_decay: f64,
}

impl Default for ActionParams {
    fn default() -> Self {
        ActionParams {
            invest_fraction: 0.2,
            business_cost: 5000.0,
            business_cash_threshold: 5000.0,
            business_revenue: 1000.0,
            return_half_width: 0.05,
            stress_penalty: 15.0,
            stress_decay: 5.0,
        }
    }
}

/// Every tunable constant of the model
///
/// The defaults are illustrative, not calibrated against real data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub household: HouseholdParams,
    pub shocks: ShockParams,
    pub policy: PolicyParams,
    pub actions: ActionParams,
}

impl ModelParams {
    pub fn monthly_costs(&self) -> f64 {
        self.household.rent + self.household.food + self.household.other_expenses
    }

    /// Every numeric parameter with its field name
    pub fn values(&self) -> Vec<(&'static str, f64)> {
        let (h, s, p, a) = (&self.household, &self.shocks, &self.policy, &self.actions);
        vec![
            ("starting_cash", h.starting_cash),
            ("salary", h.salary),
            ("rent", h.rent),
            ("food", h.food),
            ("other_expenses", h.other_expenses),
            ("side_hustle_min", h.side_hustle_min),
            ("side_hustle_max", h.side_hustle_max),
            ("recession_job_loss", s.recession_job_loss),
            ("job_loss", s.job_loss),
            ("unexpected_expense", s.unexpected_expense),
            ("unexpected_expense_amount", s.unexpected_expense_amount),
            ("job_loss_stress", s.job_loss_stress),
            ("savings_target_months", p.savings_target_months),
            ("save_shortfall_weight", p.save_shortfall_weight),
            ("save_discipline_weight", p.save_discipline_weight),
            ("save_risk_penalty", p.save_risk_penalty),
            ("invest_runway_weight", p.invest_runway_weight),
            ("invest_discipline_weight", p.invest_discipline_weight),
            ("business_risk_weight", p.business_risk_weight),
            ("job_search_score", p.job_search_score),
            ("forbidden_score", p.forbidden_score),
            ("jitter_amplitude", p.jitter_amplitude),
            ("invest_fraction", a.invest_fraction),
            ("business_cost", a.business_cost),
            ("business_cash_threshold", a.business_cash_threshold),
            ("business_revenue", a.business_revenue),
            ("return_half_width", a.return_half_width),
            ("stress_penalty", a.stress_penalty),
            ("stress_decay", a.stress_decay),
        ]
    }

    /// Harsher shocks: job losses twice as likely and a larger expense
    pub fn volatile() -> Self {
        ModelParams {
            shocks: ShockParams {
                recession_job_loss: 0.16,
                job_loss: 0.06,
                unexpected_expense: 0.12,
                unexpected_expense_amount: 3000.0,
                ..ShockParams::default()
            },
            ..Self::default()
        }
    }
}
