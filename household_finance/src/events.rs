//! Random life shocks applied at the start of each month

use std::fmt;

use crate::config::Economy;
use crate::household::Household;
use crate::params::ShockParams;
use crate::random::UniformSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeEvent {
    /// Job lost to the recession band
    RecessionLayoff,
    /// Job lost to the ordinary band
    Layoff,
    UnexpectedExpense,
}

impl fmt::Display for LifeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeEvent::RecessionLayoff => write!(f, "recession layoff"),
            LifeEvent::Layoff => write!(f, "layoff"),
            LifeEvent::UnexpectedExpense => write!(f, "unexpected expense"),
        }
    }
}

/// Map one uniform draw to at most one event
///
/// Bands are checked in priority order and the first match wins. With a
/// recession the recession band (0.08) shadows the ordinary job-loss band
/// (0.03) completely, so `Layoff` is only reachable in a normal economy.
pub fn classify(draw: f64, economy: Economy, shocks: &ShockParams) -> Option<LifeEvent> {
    if economy.recession && draw < shocks.recession_job_loss {
        Some(LifeEvent::RecessionLayoff)
    } else if draw < shocks.job_loss {
        Some(LifeEvent::Layoff)
    } else if draw < shocks.unexpected_expense {
        Some(LifeEvent::UnexpectedExpense)
    } else {
        None
    }
}

/// Draw once and apply the resulting shock, if any, to the household
///
/// Touches only `cash`, `employed` and `stress`.
pub fn apply_events<R: UniformSource + ?Sized>(
    household: &mut Household,
    economy: Economy,
    shocks: &ShockParams,
    rng: &mut R,
) -> Option<LifeEvent> {
    let event = classify(rng.uniform(), economy, shocks)?;

    match event {
        LifeEvent::RecessionLayoff | LifeEvent::Layoff => {
            household.employed = false;
            household.stress += shocks.job_loss_stress;
        }
        LifeEvent::UnexpectedExpense => {
            household.cash -= shocks.unexpected_expense_amount;
        }
    }

    tracing::debug!(household = %household.name, %event, "life event");
    Some(event)
}
