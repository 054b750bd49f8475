use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::asset_class::AssetClass;
use super::position::Position;

/// Cost, value and gain summed over every position of one asset class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassTotals {
    /// Σ market value
    pub value: f64,
    /// Σ gain amount
    pub gain: f64,
    /// Σ units × buying price
    pub cost: f64,
}

/// Per-class totals plus the accrued interest of bond positions.
///
/// Keyed by [`AssetClass`] in a `BTreeMap` so iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedTotals {
    pub classes: BTreeMap<AssetClass, ClassTotals>,
    /// Σ accrued interest over bond positions only
    pub accrued_interest: f64,
}

impl GroupedTotals {
    pub fn get(&self, asset_class: &AssetClass) -> Option<&ClassTotals> {
        self.classes.get(asset_class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn total_value(&self) -> f64 {
        self.classes.values().map(|t| t.value).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.classes.values().map(|t| t.cost).sum()
    }

    pub fn total_gain(&self) -> f64 {
        self.classes.values().map(|t| t.gain).sum()
    }

    /// Value of a class, 0 when no position carries it.
    pub fn value_of(&self, asset_class: &AssetClass) -> f64 {
        self.classes.get(asset_class).map(|t| t.value).unwrap_or(0.0)
    }
}

/// Gain or loss of a holding against its cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainLoss {
    /// units × buying price
    pub total_cost: f64,
    /// market value − total cost
    pub gain_amount: f64,
    /// gain amount / total cost × 100.
    /// `None` when the cost basis is zero: a percentage is not applicable.
    pub gain_percent: Option<f64>,
}

impl GainLoss {
    pub fn compute(units: f64, buying_price: f64, market_value: f64) -> Self {
        let total_cost = units * buying_price;
        let gain_amount = market_value - total_cost;
        Self {
            total_cost,
            gain_amount,
            gain_percent: percent_of(gain_amount, total_cost),
        }
    }

    /// Formatted percentage for tables: `"+12.34%"`, `"-5.00%"` or `"N/A"`.
    pub fn percent_label(&self) -> String {
        format_percent(self.gain_percent)
    }
}

/// `part / base × 100`, or `None` when the result would not be finite.
pub(crate) fn percent_of(part: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let pct = part * 100.0 / base;
    pct.is_finite().then_some(pct)
}

/// Render an optional percentage with an explicit sign and two decimals.
pub fn format_percent(pct: Option<f64>) -> String {
    match pct {
        Some(p) if p >= 0.0 => format!("+{p:.2}%"),
        Some(p) => format!("{p:.2}%"),
        None => "N/A".to_string(),
    }
}

/// One slice of the allocation chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub asset_class: AssetClass,
    pub value: f64,
    /// Share of the total portfolio value, rounded to one decimal
    pub percentage: f64,
}

/// Which end of the gain-percent ranking to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformerDirection {
    /// Highest gain percent first
    Best,
    /// Lowest gain percent first
    Worst,
}

/// Everything the dashboard header and allocation tab display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Date this summary was computed for
    pub as_of_date: NaiveDate,

    /// Display currency (no conversion is applied)
    pub currency: String,

    pub position_count: usize,

    /// Σ market value over all positions
    pub total_value: f64,

    /// Σ cost basis over all positions
    pub total_cost: f64,

    /// total_value − total_cost
    pub total_gain: f64,

    /// total_gain / total_cost × 100, `None` when nothing has a cost basis
    pub total_gain_percent: Option<f64>,

    /// Accrued interest over bond positions
    pub accrued_interest: f64,

    pub grouped: GroupedTotals,

    pub allocation: Vec<AllocationEntry>,

    pub best_performers: Vec<Position>,

    pub worst_performers: Vec<Position>,
}
