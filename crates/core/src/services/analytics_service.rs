use chrono::NaiveDate;
use log::debug;

use crate::models::analytics::{
    percent_of, AllocationEntry, GainLoss, GroupedTotals, PerformerDirection,
    PortfolioSummary,
};
use crate::models::position::Position;
use crate::models::settings::Settings;

/// Computes portfolio analytics: grouped totals, gain/loss, allocation, rankings.
///
/// Pure business logic: no I/O, no state, no caching. Every call recomputes
/// from the slice it is given, so identical input always gives identical output.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Sum value, gain and cost per asset class, plus bond accrued interest.
    ///
    /// Positions with a legacy class are grouped under that class, never dropped.
    /// Keys are normalized, so a position stored as `Other("Cash")` counts as cash.
    /// An empty slice yields an empty mapping and zero interest.
    pub fn compute_grouped_totals(&self, positions: &[Position]) -> GroupedTotals {
        let mut grouped = GroupedTotals::default();

        for position in positions {
            let gain_loss = position.gain_loss();
            let asset_class = position.asset_class.clone().normalized();
            if asset_class.is_bond_like() {
                grouped.accrued_interest += position.accrued_interest;
            }

            let totals = grouped.classes.entry(asset_class).or_default();
            totals.value += position.market_value;
            totals.gain += gain_loss.gain_amount;
            totals.cost += gain_loss.total_cost;
        }

        grouped
    }

    /// Cost basis, gain amount and gain percent for one holding.
    ///
    /// The percent is `None` when `units × buying_price` is zero.
    pub fn compute_gain_loss(&self, units: f64, buying_price: f64, market_value: f64) -> GainLoss {
        GainLoss::compute(units, buying_price, market_value)
    }

    /// Share of each class in the total portfolio value.
    ///
    /// Percentages are rounded to one decimal. A zero total gives 0% for
    /// every class. Entries are ordered by value, largest first; equal values
    /// keep class order.
    pub fn compute_allocation(&self, grouped: &GroupedTotals, total_value: f64) -> Vec<AllocationEntry> {
        let mut allocation: Vec<AllocationEntry> = grouped
            .classes
            .iter()
            .map(|(asset_class, totals)| {
                let percentage = if total_value > 0.0 {
                    round_one_decimal(totals.value / total_value * 100.0)
                } else {
                    0.0
                };
                AllocationEntry {
                    asset_class: asset_class.clone(),
                    value: totals.value,
                    percentage,
                }
            })
            .collect();

        allocation.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
        allocation
    }

    /// The `n` positions with the highest (`Best`) or lowest (`Worst`) gain percent.
    ///
    /// Ties keep input order. Positions without a cost basis have no gain
    /// percent and are left out of both rankings. The result therefore holds
    /// fewer than `n` entries whenever fewer than `n` positions have a cost
    /// basis, even when `positions.len() >= n`.
    pub fn rank_performers(
        &self,
        positions: &[Position],
        n: usize,
        direction: PerformerDirection,
    ) -> Vec<Position> {
        let mut ranked: Vec<(f64, &Position)> = positions
            .iter()
            .filter_map(|p| p.gain_loss().gain_percent.map(|pct| (pct, p)))
            .collect();

        // sort_by is stable, so equal keys stay in input order
        match direction {
            PerformerDirection::Best => {
                ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
            }
            PerformerDirection::Worst => {
                ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            }
        }

        ranked.into_iter().take(n).map(|(_, p)| p.clone()).collect()
    }

    /// Build the dashboard summary for the given positions.
    pub fn summarize(&self, positions: &[Position], settings: &Settings, as_of: NaiveDate) -> PortfolioSummary {
        let grouped = self.compute_grouped_totals(positions);
        let total_value: f64 = positions.iter().map(|p| p.market_value).sum();
        let total_cost = grouped.total_cost();
        let total_gain = grouped.total_gain();
        let allocation = self.compute_allocation(&grouped, total_value);

        let n = settings.performer_count;
        let best_performers = self.rank_performers(positions, n, PerformerDirection::Best);
        let worst_performers = self.rank_performers(positions, n, PerformerDirection::Worst);

        debug!(
            "Summarized {} positions in {} classes: value={total_value:.2}, cost={total_cost:.2}",
            positions.len(),
            grouped.classes.len(),
        );

        PortfolioSummary {
            as_of_date: as_of,
            currency: settings.display_currency.clone(),
            position_count: positions.len(),
            total_value,
            total_cost,
            total_gain,
            total_gain_percent: percent_of(total_gain, total_cost),
            accrued_interest: grouped.accrued_interest,
            grouped,
            allocation,
            best_performers,
            worst_performers,
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
