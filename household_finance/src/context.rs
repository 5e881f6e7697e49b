use crate::error::SimulationError;
use crate::household::Household;

/// Signals derived from a household's state, read by the policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionContext {
    /// Months of fixed costs covered by current cash
    pub emergency_months: f64,
}

pub fn derive_context(household: &Household) -> Result<DecisionContext, SimulationError> {
    let costs = household.monthly_costs();
    if costs == 0.0 {
        return Err(SimulationError::ZeroMonthlyCosts {
            name: household.name.clone(),
        });
    }

    Ok(DecisionContext {
        emergency_months: household.cash / costs,
    })
}
