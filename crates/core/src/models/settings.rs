use serde::{Deserialize, Serialize};

use super::chart::{ClassVisibility, LookbackWindow};

/// Number of positions listed in each performer ranking by default.
pub const DEFAULT_PERFORMER_COUNT: usize = 5;

/// User-configurable settings, stored inside the encrypted ledger file.
///
/// Every field falls back to its default when missing, so ledgers written
/// by older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency label shown next to every amount (e.g., "USD", "EUR").
    /// Display only: amounts are never converted.
    pub display_currency: String,

    /// How many positions the best/worst performer lists show.
    pub performer_count: usize,

    /// Lookback window the history chart opens with.
    pub default_window: LookbackWindow,

    /// Which class series the history chart shows.
    pub visible_classes: ClassVisibility,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: "USD".to_string(),
            performer_count: DEFAULT_PERFORMER_COUNT,
            default_window: LookbackWindow::All,
            visible_classes: ClassVisibility::all(),
        }
    }
}
