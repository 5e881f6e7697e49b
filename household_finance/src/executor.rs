use crate::household::{Business, Household};
use crate::params::ActionParams;
use crate::policy::Action;

/// Apply the deterministic financial effect of `action`
///
/// `invest` moves a fixed share of current cash, whatever its sign; the
/// policy only offers it with several months of runway, so cash is positive
/// in practice. `start_business` is a no-op if a business already exists.
pub fn execute(household: &mut Household, action: Action, params: &ActionParams) {
    match action {
        Action::Save => {}
        Action::Invest => {
            let transfer = household.cash * params.invest_fraction;
            household.investments += transfer;
            household.cash -= transfer;
        }
        Action::StartBusiness => {
            if household.open_business(Business::new(params.business_revenue)) {
                household.cash -= params.business_cost;
            }
        }
        Action::JobSearch => {
            household.employed = true;
        }
    }
}
