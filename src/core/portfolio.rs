//! Portfolio summary - priced totals across a directory of budgets

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::entities::budget::{Budget, BudgetStatus, BUDGET_FILE_SUFFIX};

/// A budget together with the file it came from and its price
#[derive(Debug, Clone)]
pub struct PricedBudget {
    pub path: PathBuf,
    pub budget: Budget,
    pub final_price: f64,

    /// Margin plus tax reached 100%, so the price fell to zero
    pub alert: bool,
}

/// Calendar month a summary covers (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryPeriod {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl SummaryPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing `now`
    pub fn containing(now: DateTime<Utc>) -> Self {
        Self::new(now.year(), now.month())
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Default for SummaryPeriod {
    fn default() -> Self {
        Self::containing(Utc::now())
    }
}

/// Totals for one status
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusTotal {
    pub count: usize,
    pub final_price: f64,
}

/// Totals per status for one month plus progress toward the monthly goal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    #[serde(flatten)]
    pub period: SummaryPeriod,

    /// Budgets dated in `period` only
    pub totals: BTreeMap<BudgetStatus, StatusTotal>,

    /// Whole percent of the goal covered by the month's approved budgets
    pub goal_percent: i64,

    /// Approved final prices per month of `period.year`, January first
    pub monthly_revenue: [f64; 12],

    /// Files that could not be read
    pub skipped: usize,
}

impl PortfolioSummary {
    /// Summarize already-priced budgets for `period` against `goal`
    pub fn for_period(budgets: &[PricedBudget], period: SummaryPeriod, goal: f64) -> Self {
        let mut totals: BTreeMap<BudgetStatus, StatusTotal> = BudgetStatus::all()
            .iter()
            .map(|s| (*s, StatusTotal::default()))
            .collect();
        let mut monthly_revenue = [0.0; 12];

        for priced in budgets {
            let date = &priced.budget.date;
            if priced.budget.status == BudgetStatus::Approved && date.year() == period.year {
                monthly_revenue[date.month0() as usize] += priced.final_price;
            }
            if !period.contains(date) {
                continue;
            }
            let entry = totals.entry(priced.budget.status).or_default();
            entry.count += 1;
            entry.final_price += priced.final_price;
        }

        let approved = totals
            .get(&BudgetStatus::Approved)
            .map(|t| t.final_price)
            .unwrap_or(0.0);
        let goal_percent = if goal > 0.0 {
            ((approved / goal) * 100.0) as i64
        } else {
            0
        };

        Self {
            period,
            totals,
            goal_percent,
            monthly_revenue,
            skipped: 0,
        }
    }

    pub fn total(&self, status: BudgetStatus) -> StatusTotal {
        self.totals.get(&status).copied().unwrap_or_default()
    }
}

/// Load and price every `*.budget.yaml` under `dir`, newest first.
///
/// Unreadable files are skipped with a warning; the count of skipped files
/// is returned alongside.
pub fn load_budgets(dir: &Path, fallback_daily_rate: f64) -> (Vec<PricedBudget>, usize) {
    let mut budgets = Vec::new();
    let mut skipped = 0;

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().to_string_lossy().ends_with(BUDGET_FILE_SUFFIX))
    {
        match Budget::load(entry.path()) {
            Ok(budget) => {
                let output = budget.price(fallback_daily_rate);
                budgets.push(PricedBudget {
                    path: entry.path().to_path_buf(),
                    budget,
                    final_price: output.final_price,
                    alert: output.has_alert(),
                });
            }
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping budget");
                skipped += 1;
            }
        }
    }

    budgets.sort_by(|a, b| b.budget.date.cmp(&a.budget.date));
    (budgets, skipped)
}

/// Scan `dir` and summarize one month of it
pub fn summarize_dir(
    dir: &Path,
    fallback_daily_rate: f64,
    period: SummaryPeriod,
    goal: f64,
) -> PortfolioSummary {
    let (budgets, skipped) = load_budgets(dir, fallback_daily_rate);
    let mut summary = PortfolioSummary::for_period(&budgets, period, goal);
    summary.skipped = skipped;
    summary
}
