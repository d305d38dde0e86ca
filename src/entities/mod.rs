//! Entity type definitions
//!
//! - [`Budget`] - a client quote with labor, extra costs and line items

pub mod budget;

pub use budget::{Budget, BudgetError, BudgetItem, BudgetStatus, Client, ItemType};
