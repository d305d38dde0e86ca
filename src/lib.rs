//! Orca: budget pricing for freelance production jobs
//!
//! Sums labor, gear and extra costs, then grosses the total up so that
//! margin and tax taken out of the final price still leave the cost covered.

pub mod cli;
pub mod core;
pub mod entities;
pub mod form;
pub mod logging;
pub mod template;
pub mod yaml;
