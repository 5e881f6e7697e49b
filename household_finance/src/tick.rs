//! One month in the life of one household
//!
//! The steps run in a fixed order, each mutating the household in place:
//! income, fixed costs, life event, decision (and its action), investment
//! return, stress, insolvency.

use crate::config::Economy;
use crate::context::derive_context;
use crate::error::SimulationError;
use crate::events::apply_events;
use crate::household::Household;
use crate::params::{ActionParams, ModelParams};
use crate::policy::{Action, decide};
use crate::random::UniformSource;

/// Credit salary, side hustle and business revenue; returns the total
///
/// The side hustle consumes a draw only when the household has one.
pub fn apply_income<R: UniformSource + ?Sized>(
    household: &mut Household,
    params: &ModelParams,
    rng: &mut R,
) -> f64 {
    let mut income = 0.0;
    if household.employed {
        income += household.salary;
    }
    if household.side_hustle {
        income += rng.uniform_range(
            params.household.side_hustle_min,
            params.household.side_hustle_max,
        );
    }
    if let Some(business) = household.business() {
        income += business.revenue();
    }
    household.cash += income;
    income
}

pub fn apply_expenses(household: &mut Household) {
    household.cash -= household.monthly_costs();
}

/// Portfolio moves by a uniform return every month, invested this month or not
pub fn apply_investment_return<R: UniformSource + ?Sized>(
    household: &mut Household,
    params: &ActionParams,
    rng: &mut R,
) -> f64 {
    let rate = rng.uniform_range(-params.return_half_width, params.return_half_width);
    household.investments *= 1.0 + rate;
    rate
}

/// Penalty when cash cannot cover next month's rent, then a flat decay floored at zero
pub fn update_stress(household: &mut Household, params: &ActionParams) {
    if household.cash < household.rent {
        household.stress += params.stress_penalty;
    }
    household.stress = (household.stress - params.stress_decay).max(0.0);
}

/// Returns true if the household went bankrupt this month
pub fn check_insolvency(household: &mut Household) -> bool {
    if household.cash < 0.0 {
        household.mark_bankrupt();
        tracing::warn!(
            household = %household.name,
            cash = household.cash,
            investments = household.investments,
            "household is insolvent"
        );
        return true;
    }
    false
}

/// Advance a living household by one month and return the action it took
///
/// Fails before touching the household when it is bankrupt or its fixed
/// costs sum to zero.
pub fn tick<R: UniformSource + ?Sized>(
    household: &mut Household,
    economy: Economy,
    params: &ModelParams,
    rng: &mut R,
) -> Result<Action, SimulationError> {
    if !household.is_alive() {
        return Err(SimulationError::AlreadyBankrupt {
            name: household.name.clone(),
        });
    }
    if household.monthly_costs() == 0.0 {
        return Err(SimulationError::ZeroMonthlyCosts {
            name: household.name.clone(),
        });
    }

    apply_income(household, params, rng);
    apply_expenses(household);
    apply_events(household, economy, &params.shocks, rng);

    let context = derive_context(household)?;
    let action = decide(household, &context, params, rng);

    apply_investment_return(household, &params.actions, rng);
    update_stress(household, &params.actions);
    check_insolvency(household);

    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::execute;
    use crate::household::Traits;
    use crate::params::HouseholdParams;
    use crate::random::SequenceSource;
    use approx::assert_relative_eq;

    fn household() -> Household {
        Household::new(
            "Test",
            "#000000",
            Traits {
                risk_tolerance: 0.5,
                discipline: 0.5,
                intelligence: 0.5,
            },
            &HouseholdParams::default(),
        )
    }

    #[test]
    fn income_is_additive() {
        let params = ModelParams::default();
        let mut household = household().with_side_hustle(true);
        household.cash = 10_000.0;
        execute(&mut household, Action::StartBusiness, &params.actions);
        let before = household.cash;

        let mut rng = SequenceSource::constant(0.25).unwrap();
        let income = apply_income(&mut household, &params, &mut rng);

        // salary + (300 + 0.25 * 400) + business revenue
        assert_relative_eq!(income, 2000.0 + 400.0 + 1000.0);
        assert_relative_eq!(household.cash, before + income);
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn no_income_when_unemployed_without_extras() {
        let params = ModelParams::default();
        let mut household = household();
        household.employed = false;
        let mut rng = SequenceSource::constant(0.5).unwrap();

        assert_eq!(apply_income(&mut household, &params, &mut rng), 0.0);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn expenses_are_unconditional() {
        let mut household = household();
        household.cash = 100.0;
        apply_expenses(&mut household);
        assert_eq!(household.cash, -1400.0);
    }

    #[test]
    fn investment_return_bounds() {
        let params = ActionParams::default();
        let mut household = household();

        household.investments = 1000.0;
        let mut rng = SequenceSource::constant(0.0).unwrap();
        apply_investment_return(&mut household, &params, &mut rng);
        assert_relative_eq!(household.investments, 950.0);

        household.investments = 1000.0;
        let mut rng = SequenceSource::constant(0.5).unwrap();
        apply_investment_return(&mut household, &params, &mut rng);
        assert_relative_eq!(household.investments, 1000.0);
    }

    #[test]
    fn stress_penalty_and_decay() {
        let params = ActionParams::default();
        let mut household = household();

        household.cash = 500.0; // below rent of 800
        update_stress(&mut household, &params);
        assert_eq!(household.stress, 10.0);

        household.cash = 5000.0;
        update_stress(&mut household, &params);
        assert_eq!(household.stress, 5.0);
        update_stress(&mut household, &params);
        assert_eq!(household.stress, 0.0);
        update_stress(&mut household, &params);
        assert_eq!(household.stress, 0.0);
    }

    #[test]
    fn quiet_month_for_a_saver() {
        let params = ModelParams::default();
        let mut household = household();
        // Draws: event, four jitters, investment return
        let mut rng = SequenceSource::constant(0.5).unwrap();

        let action = tick(&mut household, Economy::default(), &params, &mut rng).unwrap();

        // Runway 5500 / 1500 = 3.67: invest 23.3 beats business 15
        assert_eq!(action, Action::Invest);
        assert_relative_eq!(household.investments, 1100.0);
        assert_relative_eq!(household.cash, 4400.0);
        assert_eq!(household.stress, 0.0);
        assert!(household.is_alive());
        assert_eq!(rng.consumed(), 6);
    }

    #[test]
    fn negative_cash_at_month_end_is_fatal() {
        let params = ModelParams::default();
        let mut household = household();
        household.cash = 200.0;
        household.employed = false;
        let mut rng = SequenceSource::constant(0.5).unwrap();

        let action = tick(&mut household, Economy::default(), &params, &mut rng).unwrap();

        assert_eq!(action, Action::JobSearch);
        assert!(household.employed);
        assert!(!household.is_alive());
        assert_relative_eq!(household.cash, -1300.0);
        assert_eq!(household.stress, 10.0);
    }

    #[test]
    fn bankrupt_household_is_not_advanced() {
        let params = ModelParams::default();
        let mut household = household();
        household.mark_bankrupt();
        household.cash = -10.0;
        let mut rng = SequenceSource::constant(0.5).unwrap();

        let result = tick(&mut household, Economy::default(), &params, &mut rng);

        assert!(matches!(result, Err(SimulationError::AlreadyBankrupt { .. })));
        assert_eq!(household.cash, -10.0);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn zero_costs_abort_the_month() {
        let params = ModelParams::default();
        let mut household = household();
        household.rent = 0.0;
        household.food = 0.0;
        household.other_expenses = 0.0;
        let mut rng = SequenceSource::constant(0.5).unwrap();

        let result = tick(&mut household, Economy::default(), &params, &mut rng);

        assert!(matches!(result, Err(SimulationError::ZeroMonthlyCosts { .. })));
        assert_eq!(household.cash, 5000.0);
        assert_eq!(household.investments, 0.0);
        assert_eq!(rng.consumed(), 0);
    }
}
