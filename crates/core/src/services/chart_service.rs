use chrono::NaiveDate;
use log::debug;

use crate::models::analytics::GroupedTotals;
use crate::models::chart::{
    AnnotatedSnapshot, ClassPerformance, ClassVisibility, LookbackWindow, SeriesPoint,
};
use crate::models::snapshot::PortfolioSnapshot;

/// Generates chart-ready data sets from holdings and the snapshot history.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Cut the history down to a lookback window and annotate period-over-period change.
    ///
    /// Keeps snapshots dated on or after `as_of − window` (all of them for
    /// [`LookbackWindow::All`]). Every kept snapshot except the first carries,
    /// per series, the percent change versus the previous *kept* snapshot;
    /// the first one has `change: None`. Hidden classes are omitted.
    ///
    /// `history` must already be sorted by date ascending (the `HistoryStore`
    /// contract). It is not re-sorted here.
    pub fn filter_and_annotate_history(
        &self,
        history: &[PortfolioSnapshot],
        window: LookbackWindow,
        visibility: &ClassVisibility,
        as_of: NaiveDate,
    ) -> Vec<AnnotatedSnapshot> {
        debug_assert!(
            history.windows(2).all(|w| w[0].date <= w[1].date),
            "snapshot history must be sorted by date"
        );

        let start = window.start_date(as_of);
        let mut annotated = Vec::new();
        let mut previous: Option<&PortfolioSnapshot> = None;

        for snapshot in history.iter().filter(|s| start.map_or(true, |from| s.date >= from)) {
            annotated.push(AnnotatedSnapshot {
                date: snapshot.date,
                total: series_point(snapshot.total_value, previous.map(|p| p.total_value)),
                cash: visibility
                    .cash
                    .then(|| series_point(snapshot.cash, previous.map(|p| p.cash))),
                bonds: visibility
                    .bonds
                    .then(|| series_point(snapshot.bonds, previous.map(|p| p.bonds))),
                equities: visibility
                    .equities
                    .then(|| series_point(snapshot.equities, previous.map(|p| p.equities))),
                alternatives: visibility
                    .alternatives
                    .then(|| series_point(snapshot.alternatives, previous.map(|p| p.alternatives))),
            });
            previous = Some(snapshot);
        }

        debug!(
            "History chart: {} of {} snapshots in window {window}",
            annotated.len(),
            history.len()
        );
        annotated
    }

    /// Cost basis against current value per class, for the performance bar chart.
    pub fn class_performance(&self, grouped: &GroupedTotals) -> Vec<ClassPerformance> {
        grouped
            .classes
            .iter()
            .map(|(asset_class, totals)| ClassPerformance {
                asset_class: asset_class.clone(),
                cost: totals.cost,
                current_value: totals.value,
                gain: totals.gain,
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn series_point(value: f64, previous: Option<f64>) -> SeriesPoint {
    SeriesPoint {
        value,
        change: previous.map(|prev| percent_change(prev, value)),
    }
}

/// `(current − previous) / previous × 100`, defined as 0 when `previous` is 0.
fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) * 100.0 / previous
}
