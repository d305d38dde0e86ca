//! Gross-up pricing calculator
//!
//! Turns job costs and percentage markups into a sale price:
//!
//! ```text
//! total_cost  = base_daily_rate * labor_days + extra_cost + sum(gear_items)
//! final_price = total_cost / (1 - (margin% + tax%) / 100)
//! ```
//!
//! When margin plus tax reach 100% or more the divisor is not positive, the
//! price is forced to zero and [`IMPOSSIBLE_MARKUP_ALERT`] is reported.

use serde::{Deserialize, Serialize};

/// Alert shown when margin plus tax leave nothing to cover the cost
pub const IMPOSSIBLE_MARKUP_ALERT: &str = "⚠️ Impossível! Margem + Imposto > 100%";

/// Cost side of a budget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInputs {
    /// Price of one day of labor
    pub base_daily_rate: f64,

    /// Number of labor days
    pub labor_days: f64,

    /// Flat extra cost (transport, food, etc.)
    pub extra_cost: f64,

    /// Equipment line values, in entry order
    pub gear_items: Vec<f64>,
}

impl CostInputs {
    /// Labor cost: daily rate times days
    pub fn labor_cost(&self) -> f64 {
        self.base_daily_rate * self.labor_days
    }

    /// Sum of gear values. A NaN entry makes the whole sum NaN.
    pub fn gear_cost(&self) -> f64 {
        self.gear_items.iter().sum()
    }

    /// Everything the job costs before margin and tax
    pub fn total_cost(&self) -> f64 {
        self.labor_cost() + self.extra_cost + self.gear_cost()
    }
}

/// Markups expressed as whole percentages (20 means 20%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Percentages {
    pub margin_percent: f64,
    pub tax_percent: f64,
}

impl Percentages {
    pub fn new(margin_percent: f64, tax_percent: f64) -> Self {
        Self {
            margin_percent,
            tax_percent,
        }
    }

    /// Share of the final price left to cover cost: 1 - (margin + tax)
    pub fn divisor(&self) -> f64 {
        let decimal_margin = self.margin_percent / 100.0;
        let decimal_tax = self.tax_percent / 100.0;
        1.0 - (decimal_margin + decimal_tax)
    }
}

/// Result of one pricing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingOutput {
    pub total_cost: f64,
    pub final_price: f64,

    /// Empty unless the markups are impossible
    #[serde(default)]
    pub alert_message: String,
}

impl PricingOutput {
    /// Whether the markup guard fired
    pub fn has_alert(&self) -> bool {
        !self.alert_message.is_empty()
    }
}

/// Price a job.
///
/// Pure and total: never fails, and the same inputs always give the same
/// output. A divisor of zero or below (margin + tax >= 100%) yields a zero
/// price with an alert instead of a division.
pub fn calculate(costs: &CostInputs, percentages: &Percentages) -> PricingOutput {
    let total_cost = costs.total_cost();
    let divisor = percentages.divisor();

    // NaN divisor compares false here and falls through to the division,
    // leaving NaN in the price like any other malformed input.
    if divisor <= 0.0 {
        tracing::debug!(
            margin = percentages.margin_percent,
            tax = percentages.tax_percent,
            "markup leaves no room for cost"
        );
        return PricingOutput {
            total_cost,
            final_price: 0.0,
            alert_message: IMPOSSIBLE_MARKUP_ALERT.to_string(),
        };
    }

    let final_price = total_cost / divisor;
    tracing::debug!(total_cost, divisor, final_price, "priced job");

    PricingOutput {
        total_cost,
        final_price,
        alert_message: String::new(),
    }
}
