//! Budget form field identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a field plays on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Typed or selected by the user
    Input,
    /// Visible text written back after each calculation
    Display,
    /// Hidden input carrying raw numbers to the form submission
    Hidden,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Input => "input",
            FieldKind::Display => "display",
            FieldKind::Hidden => "hidden",
        };
        write!(f, "{}", name)
    }
}

/// Every named field the pricing form reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    BaseDailyRate,
    LaborDays,
    ExtraCost,
    MarginRange,
    TaxInput,
    DisplayCost,
    MarginDisplay,
    FinalPriceDisplay,
    AlertMsg,
    TotalCostInput,
    FinalPriceInput,
}

impl FieldId {
    pub const INPUTS: [FieldId; 5] = [
        FieldId::BaseDailyRate,
        FieldId::LaborDays,
        FieldId::ExtraCost,
        FieldId::MarginRange,
        FieldId::TaxInput,
    ];

    pub const OUTPUTS: [FieldId; 6] = [
        FieldId::DisplayCost,
        FieldId::MarginDisplay,
        FieldId::FinalPriceDisplay,
        FieldId::AlertMsg,
        FieldId::TotalCostInput,
        FieldId::FinalPriceInput,
    ];

    /// Element id on the page
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::BaseDailyRate => "base_daily_rate",
            FieldId::LaborDays => "labor_days",
            FieldId::ExtraCost => "extra_cost",
            FieldId::MarginRange => "margin_range",
            FieldId::TaxInput => "tax_input",
            FieldId::DisplayCost => "display_cost",
            FieldId::MarginDisplay => "margin_display",
            FieldId::FinalPriceDisplay => "final_price_display",
            FieldId::AlertMsg => "alert_msg",
            FieldId::TotalCostInput => "total_cost_input",
            FieldId::FinalPriceInput => "final_price_input",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::BaseDailyRate
            | FieldId::LaborDays
            | FieldId::ExtraCost
            | FieldId::MarginRange
            | FieldId::TaxInput => FieldKind::Input,
            FieldId::DisplayCost
            | FieldId::MarginDisplay
            | FieldId::FinalPriceDisplay
            | FieldId::AlertMsg => FieldKind::Display,
            FieldId::TotalCostInput | FieldId::FinalPriceInput => FieldKind::Hidden,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::INPUTS
            .iter()
            .chain(FieldId::OUTPUTS.iter())
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown form field: {}", s))
    }
}
