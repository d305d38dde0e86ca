//! Core module - pricing, number handling and configuration

pub mod config;
pub mod identity;
pub mod number;
pub mod portfolio;
pub mod pricing;
pub mod rates;

pub use config::Config;
pub use identity::{BudgetId, IdParseError};
pub use portfolio::{PortfolioSummary, PricedBudget, SummaryPeriod};
pub use pricing::{calculate, CostInputs, Percentages, PricingOutput, IMPOSSIBLE_MARKUP_ALERT};
pub use rates::{RatePlan, Rates, HOURS_PER_DAY};
