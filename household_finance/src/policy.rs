//! Scoring policy that picks one action per household per month
//!
//! Each candidate action gets a base score from the household's traits and
//! its emergency runway, plus an independent uniform jitter in
//! [-amplitude/2, +amplitude/2). The highest jittered score wins.
//!
//! Ties are resolved by [`Action::ALL`] order (save, invest, start_business,
//! job_search): an action only replaces the current best if its score is
//! strictly greater, so the first action holding the maximum is chosen.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::DecisionContext;
use crate::executor::execute;
use crate::household::Household;
use crate::params::{ActionParams, ModelParams, PolicyParams};
use crate::random::UniformSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Save,
    Invest,
    StartBusiness,
    JobSearch,
}

impl Action {
    /// Canonical enumeration order, also the tie-break order
    pub const ALL: [Action; 4] = [
        Action::Save,
        Action::Invest,
        Action::StartBusiness,
        Action::JobSearch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Save => "save",
            Action::Invest => "invest",
            Action::StartBusiness => "start_business",
            Action::JobSearch => "job_search",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score of every action, indexed by [`Action`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores([f64; 4]);

impl Scores {
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    /// First action in canonical order whose score no other action exceeds
    pub fn best(&self) -> Action {
        let mut best = Action::Save;
        for action in Action::ALL {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }

    /// Add an independent jitter draw to every score
    pub fn jittered<R: UniformSource + ?Sized>(mut self, amplitude: f64, rng: &mut R) -> Self {
        for score in &mut self.0 {
            *score += (rng.uniform() - 0.5) * amplitude;
        }
        self
    }
}

/// Scores before jitter
pub fn base_scores(
    household: &Household,
    context: &DecisionContext,
    policy: &PolicyParams,
    actions: &ActionParams,
) -> Scores {
    let traits = household.traits();
    let runway = context.emergency_months;

    let save = (policy.savings_target_months - runway) * policy.save_shortfall_weight
        + traits.discipline * policy.save_discipline_weight
        - traits.risk_tolerance * policy.save_risk_penalty;

    let invest = if runway > policy.savings_target_months {
        runway * policy.invest_runway_weight + traits.discipline * policy.invest_discipline_weight
    } else {
        policy.forbidden_score
    };

    let start_business =
        if household.cash > actions.business_cash_threshold && !household.has_business() {
            traits.risk_tolerance * policy.business_risk_weight
        } else {
            policy.forbidden_score
        };

    let job_search = if household.employed {
        policy.forbidden_score
    } else {
        policy.job_search_score
    };

    Scores([save, invest, start_business, job_search])
}

/// Pick an action without touching the household
pub fn select_action<R: UniformSource + ?Sized>(
    household: &Household,
    context: &DecisionContext,
    params: &ModelParams,
    rng: &mut R,
) -> Action {
    base_scores(household, context, &params.policy, &params.actions)
        .jittered(params.policy.jitter_amplitude, rng)
        .best()
}

/// Pick an action, carry it out and report which one it was
pub fn decide<R: UniformSource + ?Sized>(
    household: &mut Household,
    context: &DecisionContext,
    params: &ModelParams,
    rng: &mut R,
) -> Action {
    let action = select_action(household, context, params, rng);
    execute(household, action, &params.actions);
    tracing::debug!(
        household = %household.name,
        runway = context.emergency_months,
        %action,
        "decided"
    );
    action
}
