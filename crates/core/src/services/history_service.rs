use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::asset_class::AssetClass;
use crate::models::position::{Position, PositionPatch};
use crate::models::snapshot::{MonthlyUpdate, PortfolioSnapshot};
use crate::services::analytics_service::AnalyticsService;
use crate::services::portfolio_service::check_amount;
use crate::stores::traits::{HistoryStore, PositionStore};

/// Records the portfolio history: captures snapshots and runs the bulk monthly update.
pub struct HistoryService {
    analytics_service: AnalyticsService,
}

impl HistoryService {
    pub fn new() -> Self {
        Self {
            analytics_service: AnalyticsService::new(),
        }
    }

    /// Snapshot the aggregate of `positions` on `date`.
    ///
    /// Legacy classes have no bucket of their own and are folded into
    /// `alternatives`, so the total always equals the sum of the buckets.
    pub fn capture_snapshot(&self, positions: &[Position], date: NaiveDate) -> PortfolioSnapshot {
        let grouped = self.analytics_service.compute_grouped_totals(positions);

        let legacy: f64 = grouped
            .classes
            .iter()
            .filter(|(asset_class, _)| !asset_class.is_known())
            .map(|(_, totals)| totals.value)
            .sum();

        PortfolioSnapshot::from_buckets(
            date,
            grouped.value_of(&AssetClass::Cash),
            grouped.value_of(&AssetClass::Bonds),
            grouped.value_of(&AssetClass::Equities),
            grouped.value_of(&AssetClass::Alternatives) + legacy,
        )
    }

    /// A new snapshot must be dated strictly after the latest one: the date
    /// is the unique ordering key of the log.
    pub fn validate_snapshot_date(
        &self,
        latest: Option<&PortfolioSnapshot>,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        match latest {
            Some(last) if date <= last.date => Err(CoreError::ValidationError(format!(
                "Snapshot date {date} must be after the latest snapshot ({})",
                last.date
            ))),
            _ => Ok(()),
        }
    }

    /// Apply a bulk monthly update and append the resulting snapshot.
    ///
    /// All revaluations are validated first; if any is invalid (unknown id,
    /// duplicate id, bad amount) or the date is not after the latest
    /// snapshot, nothing is written.
    pub async fn monthly_update(
        &self,
        positions: &mut dyn PositionStore,
        history: &mut dyn HistoryStore,
        update: MonthlyUpdate,
    ) -> Result<PortfolioSnapshot, CoreError> {
        let latest = history.latest().await?;
        self.validate_snapshot_date(latest.as_ref(), update.date)?;

        // Phase 1: validate every revaluation against the current positions
        let mut seen = HashSet::new();
        let mut revalued = Vec::with_capacity(update.revaluations.len());
        for revaluation in &update.revaluations {
            if !seen.insert(revaluation.position_id) {
                return Err(CoreError::ValidationError(format!(
                    "Position {} is revalued more than once",
                    revaluation.position_id
                )));
            }
            check_amount("market value", revaluation.market_value)?;

            let mut position = positions
                .get(revaluation.position_id)
                .await?
                .ok_or_else(|| CoreError::PositionNotFound(revaluation.position_id.to_string()))?;
            position.apply_patch(PositionPatch::market_value(revaluation.market_value), update.date);
            revalued.push(position);
        }

        // Phase 2: all valid, write them and snapshot the result
        for position in revalued {
            positions.upsert(position).await?;
        }

        let current = positions.list().await?;
        let snapshot = self.capture_snapshot(&current, update.date);
        history.append(snapshot.clone()).await?;

        debug!(
            "Monthly update {}: {} revaluations, total={:.2}",
            update.date,
            update.revaluations.len(),
            snapshot.total_value
        );
        Ok(snapshot)
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}
