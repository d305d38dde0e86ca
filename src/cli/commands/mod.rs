//! CLI command implementations

pub mod budget;
pub mod calc;
pub mod completions;
pub mod config;
pub mod form;
pub mod rate;
