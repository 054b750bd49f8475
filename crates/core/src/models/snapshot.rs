use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that the buckets add up to the total.
const SUM_TOLERANCE: f64 = 1e-6;

/// A dated, immutable record of total and per-class portfolio value.
///
/// Created only by the monthly update and appended to the history log.
/// `date` is the unique ordering key of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub total_value: f64,
    pub cash: f64,
    pub bonds: f64,
    pub equities: f64,
    pub alternatives: f64,
}

impl PortfolioSnapshot {
    /// Build a snapshot whose total is the sum of the four buckets.
    pub fn from_buckets(date: NaiveDate, cash: f64, bonds: f64, equities: f64, alternatives: f64) -> Self {
        Self {
            date,
            total_value: cash + bonds + equities + alternatives,
            cash,
            bonds,
            equities,
            alternatives,
        }
    }

    /// Sum of the per-class buckets.
    pub fn bucket_sum(&self) -> f64 {
        self.cash + self.bonds + self.equities + self.alternatives
    }

    /// `total_value == Σ buckets`, within floating-point tolerance.
    pub fn is_consistent(&self) -> bool {
        (self.total_value - self.bucket_sum()).abs() <= SUM_TOLERANCE
    }
}

/// New market value for one position, as entered in the monthly update form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Revaluation {
    pub position_id: uuid::Uuid,
    pub market_value: f64,
}

/// Bulk "monthly update": revalue several positions at once, then record
/// the resulting portfolio snapshot for `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUpdate {
    pub date: NaiveDate,
    #[serde(default)]
    pub revaluations: Vec<Revaluation>,
}

impl MonthlyUpdate {
    /// An update that only records a snapshot of the current values.
    pub fn snapshot_only(date: NaiveDate) -> Self {
        Self {
            date,
            revaluations: Vec::new(),
        }
    }

    pub fn revalue(mut self, position_id: uuid::Uuid, market_value: f64) -> Self {
        self.revaluations.push(Revaluation {
            position_id,
            market_value,
        });
        self
    }
}
