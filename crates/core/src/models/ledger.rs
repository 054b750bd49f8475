use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::position::Position;
use super::settings::Settings;
use super::snapshot::PortfolioSnapshot;

/// The persisted aggregate. Everything in here gets serialized,
/// encrypted, and saved to the portable ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Current holdings, in insertion order
    pub positions: Vec<Position>,

    /// Snapshot log, ascending by date
    pub history: Vec<PortfolioSnapshot>,

    #[serde(default)]
    pub settings: Settings,
}

impl Ledger {
    /// Check the invariants the stores rely on before the ledger is written
    /// or after it is read back: unique position ids, strictly increasing
    /// snapshot dates, bucket sums matching totals, and a usable performer count.
    pub fn check_consistency(&self) -> Result<(), CoreError> {
        let mut ids = HashSet::with_capacity(self.positions.len());
        for position in &self.positions {
            if !ids.insert(position.id) {
                return Err(CoreError::ValidationError(format!(
                    "Position {} appears more than once",
                    position.id
                )));
            }
        }

        for pair in self.history.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::ValidationError(format!(
                    "Snapshot dated {} follows snapshot dated {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(snapshot) = self.history.iter().find(|s| !s.is_consistent()) {
            return Err(CoreError::ValidationError(format!(
                "Snapshot dated {} has buckets that do not add up to its total {:.2}",
                snapshot.date, snapshot.total_value
            )));
        }

        if self.settings.performer_count == 0 {
            return Err(CoreError::ValidationError(
                "Performer count must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
