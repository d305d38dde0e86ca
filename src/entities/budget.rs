//! Budget entity - a priced quote for one client job
//!
//! A budget collects the cost side of a job (labor days, extra costs and
//! line items such as rented gear or hired freelancers) together with the
//! margin and tax to apply. Pricing goes through the same gross-up
//! calculator the budget form uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::identity::BudgetId;
use crate::core::pricing::{calculate, CostInputs, Percentages, PricingOutput};
use crate::yaml::{parse_yaml_file, parse_yaml_str, YamlError};

/// File suffix for budget documents
pub const BUDGET_FILE_SUFFIX: &str = ".budget.yaml";

/// Margin applied when a budget does not state one
pub const DEFAULT_MARGIN_PERCENT: f64 = 30.0;

/// Where a budget stands with the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum BudgetStatus {
    #[default]
    Pending,
    Approved,
    Lost,
}

impl BudgetStatus {
    pub fn all() -> &'static [BudgetStatus] {
        &[BudgetStatus::Pending, BudgetStatus::Approved, BudgetStatus::Lost]
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::Pending => write!(f, "pending"),
            BudgetStatus::Approved => write!(f, "approved"),
            BudgetStatus::Lost => write!(f, "lost"),
        }
    }
}

impl std::str::FromStr for BudgetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BudgetStatus::Pending),
            "approved" => Ok(BudgetStatus::Approved),
            "lost" => Ok(BudgetStatus::Lost),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Kind of cost a line item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ItemType {
    /// Equipment rental
    Gear,
    /// Hired crew member
    Freelancer,
    #[default]
    Other,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Gear => write!(f, "gear"),
            ItemType::Freelancer => write!(f, "freelancer"),
            ItemType::Other => write!(f, "other"),
        }
    }
}

/// One priced line on a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub name: String,

    #[serde(default)]
    pub item_type: ItemType,

    /// Price per day
    #[serde(default)]
    pub value: f64,

    /// Days the item is needed
    #[serde(default = "default_days")]
    pub days: f64,
}

fn default_days() -> f64 {
    1.0
}

impl BudgetItem {
    pub fn new(name: impl Into<String>, item_type: ItemType, value: f64, days: f64) -> Self {
        Self {
            name: name.into(),
            item_type,
            value,
            days,
        }
    }

    /// Line cost: value times days
    pub fn cost(&self) -> f64 {
        self.value * self.days
    }
}

/// Client details, copied onto the budget so old quotes keep their history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,

    /// Company registration number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Errors loading or saving budgets
#[derive(Debug, Error, miette::Diagnostic)]
pub enum BudgetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("IO error: {0}")]
    #[diagnostic(code(orca::budget::io))]
    Io(#[from] std::io::Error),

    #[error("failed to serialize budget: {0}")]
    #[diagnostic(code(orca::budget::serialize))]
    Serialize(String),
}

/// Budget entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier (BGT-...)
    pub id: BudgetId,

    /// Job title
    pub title: String,

    pub client: Client,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Date the quote was issued
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub status: BudgetStatus,

    /// Day rate for labor. When absent the configured hourly rate is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_daily_rate: Option<f64>,

    #[serde(default)]
    pub labor_days: f64,

    #[serde(default)]
    pub extra_cost: f64,

    #[serde(default = "default_margin")]
    pub margin_percent: f64,

    #[serde(default)]
    pub tax_percent: f64,

    #[serde(default)]
    pub items: Vec<BudgetItem>,

    #[serde(default)]
    pub author: String,
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN_PERCENT
}

impl Budget {
    /// Create a new budget with required fields
    pub fn new(title: impl Into<String>, client: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: BudgetId::new(),
            title: title.into(),
            client: Client {
                name: client.into(),
                ..Default::default()
            },
            description: None,
            date: Utc::now(),
            status: BudgetStatus::default(),
            base_daily_rate: None,
            labor_days: 0.0,
            extra_cost: 0.0,
            margin_percent: DEFAULT_MARGIN_PERCENT,
            tax_percent: 0.0,
            items: Vec::new(),
            author: author.into(),
        }
    }

    /// Day rate in effect: the budget's own, else `fallback`
    pub fn daily_rate(&self, fallback: f64) -> f64 {
        self.base_daily_rate.unwrap_or(fallback)
    }

    /// Calculator inputs; each line item contributes value times days
    pub fn cost_inputs(&self, fallback_daily_rate: f64) -> CostInputs {
        CostInputs {
            base_daily_rate: self.daily_rate(fallback_daily_rate),
            labor_days: self.labor_days,
            extra_cost: self.extra_cost,
            gear_items: self.items.iter().map(BudgetItem::cost).collect(),
        }
    }

    pub fn percentages(&self) -> Percentages {
        Percentages::new(self.margin_percent, self.tax_percent)
    }

    /// Price the budget
    pub fn price(&self, fallback_daily_rate: f64) -> PricingOutput {
        calculate(&self.cost_inputs(fallback_daily_rate), &self.percentages())
    }

    /// Sum of line items of one type
    pub fn items_cost(&self, item_type: ItemType) -> f64 {
        self.items
            .iter()
            .filter(|i| i.item_type == item_type)
            .map(BudgetItem::cost)
            .sum()
    }

    /// Parse a budget from YAML text
    pub fn from_yaml(content: &str, filename: &str) -> Result<Self, BudgetError> {
        Ok(parse_yaml_str(content, filename)?)
    }

    /// Load a budget file
    pub fn load(path: &Path) -> Result<Self, BudgetError> {
        Ok(parse_yaml_file(path)?)
    }

    /// Write the budget as YAML
    pub fn save(&self, path: &Path) -> Result<(), BudgetError> {
        let yaml = serde_yml::to_string(self).map_err(|e| BudgetError::Serialize(e.to_string()))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Conventional file name: `<id>.budget.yaml`
    pub fn file_name(&self) -> String {
        format!("{}{}", self.id, BUDGET_FILE_SUFFIX)
    }
}
