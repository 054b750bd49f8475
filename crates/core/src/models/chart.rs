use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::asset_class::AssetClass;

/// Lookback window selectable on the history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LookbackWindow {
    Days30,
    Days60,
    Days90,
    Days180,
    Days365,
    Days730,
    /// Unbounded: the whole history
    #[default]
    All,
}

impl LookbackWindow {
    /// Every selectable window, shortest first.
    pub const ALL_WINDOWS: [LookbackWindow; 7] = [
        LookbackWindow::Days30,
        LookbackWindow::Days60,
        LookbackWindow::Days90,
        LookbackWindow::Days180,
        LookbackWindow::Days365,
        LookbackWindow::Days730,
        LookbackWindow::All,
    ];

    /// Window length in days, `None` for [`LookbackWindow::All`].
    pub fn days(&self) -> Option<i64> {
        match self {
            LookbackWindow::Days30 => Some(30),
            LookbackWindow::Days60 => Some(60),
            LookbackWindow::Days90 => Some(90),
            LookbackWindow::Days180 => Some(180),
            LookbackWindow::Days365 => Some(365),
            LookbackWindow::Days730 => Some(730),
            LookbackWindow::All => None,
        }
    }

    /// Earliest date included when looking back from `as_of` (inclusive).
    pub fn start_date(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        self.days()
            .and_then(|days| as_of.checked_sub_signed(chrono::Duration::days(days)))
    }

    /// Parse a chart selector value: `"30"`, `"30d"` or `"all"`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let value = raw.trim().to_lowercase();
        if value == "all" {
            return Ok(LookbackWindow::All);
        }
        let digits = value.strip_suffix('d').unwrap_or(&value);
        match digits {
            "30" => Ok(LookbackWindow::Days30),
            "60" => Ok(LookbackWindow::Days60),
            "90" => Ok(LookbackWindow::Days90),
            "180" => Ok(LookbackWindow::Days180),
            "365" => Ok(LookbackWindow::Days365),
            "730" => Ok(LookbackWindow::Days730),
            _ => Err(CoreError::ValidationError(format!(
                "Unknown lookback window '{raw}': expected 30, 60, 90, 180, 365, 730 or all"
            ))),
        }
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.days() {
            Some(days) => write!(f, "{days}d"),
            None => write!(f, "all"),
        }
    }
}

/// Per-class toggles for the history chart. Hidden classes get no series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassVisibility {
    pub cash: bool,
    pub bonds: bool,
    pub equities: bool,
    pub alternatives: bool,
}

impl Default for ClassVisibility {
    fn default() -> Self {
        Self::all()
    }
}

impl ClassVisibility {
    pub fn all() -> Self {
        Self {
            cash: true,
            bonds: true,
            equities: true,
            alternatives: true,
        }
    }

    pub fn none() -> Self {
        Self {
            cash: false,
            bonds: false,
            equities: false,
            alternatives: false,
        }
    }

    /// Visibility of a snapshot bucket. Legacy classes are charted inside
    /// the alternatives bucket.
    pub fn is_visible(&self, asset_class: &AssetClass) -> bool {
        match asset_class {
            AssetClass::Cash => self.cash,
            AssetClass::Bonds => self.bonds,
            AssetClass::Equities => self.equities,
            AssetClass::Alternatives | AssetClass::Other(_) => self.alternatives,
        }
    }

    pub fn set(&mut self, asset_class: &AssetClass, visible: bool) {
        match asset_class {
            AssetClass::Cash => self.cash = visible,
            AssetClass::Bonds => self.bonds = visible,
            AssetClass::Equities => self.equities = visible,
            AssetClass::Alternatives | AssetClass::Other(_) => self.alternatives = visible,
        }
    }
}

/// One value of a charted series, with its change versus the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub value: f64,
    /// Percent change versus the previous point in the window.
    /// `None` on the first point: there is nothing to compare with.
    pub change: Option<f64>,
}

/// A snapshot prepared for the history chart.
///
/// Hidden classes are `None` and left out of the serialized output, so the
/// charting layer renders no series for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSnapshot {
    pub date: NaiveDate,
    pub total: SeriesPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equities: Option<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<SeriesPoint>,
}

/// Bar chart row: cost basis against current value for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPerformance {
    pub asset_class: AssetClass,
    pub cost: f64,
    pub current_value: f64,
    pub gain: f64,
}
