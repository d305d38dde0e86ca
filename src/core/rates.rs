//! Rate planning - derive an hourly rate from a monthly revenue goal

use serde::{Deserialize, Serialize};

/// Working hours in one labor day
pub const HOURS_PER_DAY: f64 = 8.0;

/// Working days assumed when none are given
pub const DEFAULT_WORKING_DAYS: f64 = 20.0;

/// Inputs for sizing a rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatePlan {
    /// Revenue wanted per month
    pub monthly_goal: f64,

    /// Fixed monthly costs to cover on top of the goal
    pub fixed_costs: f64,

    /// Working days per month; zero falls back to [`DEFAULT_WORKING_DAYS`]
    pub working_days: f64,
}

/// Derived rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub working_days: f64,
    pub hourly_rate: f64,
    pub daily_rate: f64,
}

impl RatePlan {
    pub fn new(monthly_goal: f64, fixed_costs: f64, working_days: f64) -> Self {
        Self {
            monthly_goal,
            fixed_costs,
            working_days,
        }
    }

    /// hourly = ((goal + costs) / days) / 8
    pub fn rates(&self) -> Rates {
        let working_days = if self.working_days == 0.0 {
            DEFAULT_WORKING_DAYS
        } else {
            self.working_days
        };
        let daily_rate = (self.monthly_goal + self.fixed_costs) / working_days;
        let hourly_rate = daily_rate / HOURS_PER_DAY;

        Rates {
            working_days,
            hourly_rate,
            daily_rate: hourly_rate * HOURS_PER_DAY,
        }
    }
}
