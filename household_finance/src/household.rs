use crate::params::HouseholdParams;

/// Personality of a household, fixed for its whole life
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traits {
    pub risk_tolerance: f64,
    pub discipline: f64,
    /// Carried for future use; no score reads it yet
    pub intelligence: f64,
}

/// A small business, once started it keeps paying the same revenue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Business {
    revenue: f64,
}

impl Business {
    pub fn new(revenue: f64) -> Self {
        Business { revenue }
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }
}

/// Financial and behavioural state of one simulated household
///
/// Mutated in place once per month by the tick. Once `alive` turns false
/// the household is frozen in its terminal state.
#[derive(Debug, Clone)]
pub struct Household {
    pub name: String,
    /// Display only
    pub color: String,

    pub cash: f64,
    pub investments: f64,
    pub salary: f64,
    pub rent: f64,
    pub food: f64,
    pub other_expenses: f64,

    traits: Traits,

    pub employed: bool,
    pub side_hustle: bool,
    business: Option<Business>,

    pub stress: f64,
    alive: bool,
}

impl Household {
    /// A freshly set-up household: starting cash and salary, employed,
    /// no investments, stress, business or side hustle
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        traits: Traits,
        params: &HouseholdParams,
    ) -> Self {
        Household {
            name: name.into(),
            color: color.into(),
            cash: params.starting_cash,
            investments: 0.0,
            salary: params.salary,
            rent: params.rent,
            food: params.food,
            other_expenses: params.other_expenses,
            traits,
            employed: true,
            side_hustle: false,
            business: None,
            stress: 0.0,
            alive: true,
        }
    }

    pub fn with_side_hustle(mut self, side_hustle: bool) -> Self {
        self.side_hustle = side_hustle;
        self
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub fn business(&self) -> Option<&Business> {
        self.business.as_ref()
    }

    pub fn has_business(&self) -> bool {
        self.business.is_some()
    }

    /// Returns false (and leaves the existing business untouched) if one
    /// was already started
    pub(crate) fn open_business(&mut self, business: Business) -> bool {
        if self.business.is_some() {
            return false;
        }
        self.business = Some(business);
        true
    }

    pub fn monthly_costs(&self) -> f64 {
        self.rent + self.food + self.other_expenses
    }

    pub fn net_worth(&self) -> f64 {
        self.cash + self.investments
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Insolvency is permanent
    pub(crate) fn mark_bankrupt(&mut self) {
        self.alive = false;
    }
}
