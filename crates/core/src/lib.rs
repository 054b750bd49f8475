pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod stores;

use chrono::NaiveDate;
use log::debug;
use models::{
    analytics::{AllocationEntry, GroupedTotals, PerformerDirection, PortfolioSummary},
    chart::{AnnotatedSnapshot, ClassPerformance, ClassVisibility, LookbackWindow},
    ledger::Ledger,
    position::{Position, PositionDraft, PositionPatch},
    settings::Settings,
    snapshot::{MonthlyUpdate, PortfolioSnapshot},
};
use services::{
    analytics_service::AnalyticsService, chart_service::ChartService,
    history_service::HistoryService, portfolio_service::PortfolioService,
};
use storage::manager::StorageManager;
use stores::{
    memory::{MemoryHistoryStore, MemoryPositionStore},
    traits::{HistoryStore, PositionStore},
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Wealth Tracker core library.
///
/// Holds the two store collaborators, the settings, and every service that
/// operates on them. Calculations always run on a fresh read of the stores.
#[must_use]
pub struct WealthTracker {
    positions: Box<dyn PositionStore>,
    history: Box<dyn HistoryStore>,
    settings: Settings,
    portfolio_service: PortfolioService,
    history_service: HistoryService,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for WealthTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WealthTracker")
            .field("position_store", &self.positions.name())
            .field("history_store", &self.history.name())
            .field("settings", &self.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl WealthTracker {
    /// Create an empty tracker backed by in-memory stores and default settings.
    pub fn create_new() -> Self {
        Self::from_ledger(Ledger::default())
    }

    /// Use caller-provided stores (e.g., a hosted document database adapter).
    pub fn with_stores(
        positions: Box<dyn PositionStore>,
        history: Box<dyn HistoryStore>,
        settings: Settings,
    ) -> Self {
        Self {
            positions,
            history,
            settings,
            portfolio_service: PortfolioService::new(),
            history_service: HistoryService::new(),
            analytics_service: AnalyticsService::new(),
            chart_service: ChartService::new(),
            dirty: false,
        }
    }

    /// Build an in-memory tracker from a loaded ledger.
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self::with_stores(
            Box::new(MemoryPositionStore::with_positions(ledger.positions)),
            Box::new(MemoryHistoryStore::with_snapshots(ledger.history)),
            ledger.settings,
        )
    }

    /// Load an existing ledger from encrypted bytes (password required).
    /// Use this for WASM / Tauri where the frontend handles file I/O.
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::from_ledger(ledger))
    }

    /// Save the current state to encrypted bytes.
    /// Clears the unsaved-changes flag on success.
    pub async fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let ledger = self.to_ledger().await?;
        let bytes = StorageManager::save_to_bytes(&ledger, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_file(path, password)?;
        Ok(Self::from_ledger(ledger))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        let ledger = self.to_ledger().await?;
        StorageManager::save_to_file(&ledger, path, password)?;
        self.dirty = false;
        Ok(())
    }

    /// Read both stores into a single persistable ledger.
    pub async fn to_ledger(&self) -> Result<Ledger, CoreError> {
        Ok(Ledger {
            positions: self.positions.list().await?,
            history: self.history.list().await?,
            settings: self.settings.clone(),
        })
    }

    // ── Positions ───────────────────────────────────────────────────

    /// Add a position from the form. Returns its fresh id.
    pub async fn add_position(&mut self, draft: PositionDraft) -> Result<Uuid, CoreError> {
        let position = self
            .portfolio_service
            .add_position(self.positions.as_mut(), draft, today())
            .await?;
        self.dirty = true;
        Ok(position.id)
    }

    /// Edit a position. Fields not present in the patch are kept.
    pub async fn update_position(&mut self, id: Uuid, patch: PositionPatch) -> Result<Position, CoreError> {
        let position = self
            .portfolio_service
            .update_position(self.positions.as_mut(), id, patch, today())
            .await?;
        self.dirty = true;
        Ok(position)
    }

    /// Delete a position by id.
    pub async fn remove_position(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.portfolio_service
            .remove_position(self.positions.as_mut(), id)
            .await?;
        self.dirty = true;
        Ok(())
    }

    /// Get a single position by id.
    pub async fn get_position(&self, id: Uuid) -> Result<Option<Position>, CoreError> {
        self.positions.get(id).await
    }

    /// All current positions.
    pub async fn positions(&self) -> Result<Vec<Position>, CoreError> {
        self.positions.list().await
    }

    /// Export all positions as a JSON string.
    pub async fn export_positions_to_json(&self) -> Result<String, CoreError> {
        let positions = self.positions.list().await?;
        serde_json::to_string_pretty(&positions)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize positions to JSON: {e}")))
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Value, cost and gain per asset class, plus bond accrued interest.
    pub async fn grouped_totals(&self) -> Result<GroupedTotals, CoreError> {
        let positions = self.positions.list().await?;
        Ok(self.analytics_service.compute_grouped_totals(&positions))
    }

    /// Allocation of the portfolio across asset classes.
    pub async fn allocation(&self) -> Result<Vec<AllocationEntry>, CoreError> {
        let positions = self.positions.list().await?;
        let grouped = self.analytics_service.compute_grouped_totals(&positions);
        let total_value: f64 = positions.iter().map(|p| p.market_value).sum();
        Ok(self.analytics_service.compute_allocation(&grouped, total_value))
    }

    /// Best or worst positions by gain percent, `performer_count` of them.
    pub async fn performers(&self, direction: PerformerDirection) -> Result<Vec<Position>, CoreError> {
        let positions = self.positions.list().await?;
        Ok(self
            .analytics_service
            .rank_performers(&positions, self.settings.performer_count, direction))
    }

    /// Full dashboard summary.
    pub async fn portfolio_summary(&self, as_of: NaiveDate) -> Result<PortfolioSummary, CoreError> {
        let positions = self.positions.list().await?;
        Ok(self.analytics_service.summarize(&positions, &self.settings, as_of))
    }

    /// Cost against value per class, for the performance bar chart.
    pub async fn class_performance(&self) -> Result<Vec<ClassPerformance>, CoreError> {
        let grouped = self.grouped_totals().await?;
        Ok(self.chart_service.class_performance(&grouped))
    }

    // ── History ─────────────────────────────────────────────────────

    /// The whole snapshot log, oldest first.
    pub async fn history(&self) -> Result<Vec<PortfolioSnapshot>, CoreError> {
        self.history.list().await
    }

    /// History chart for a window (the configured default when `None`),
    /// showing the configured visible classes.
    pub async fn history_chart(
        &self,
        window: Option<LookbackWindow>,
        as_of: NaiveDate,
    ) -> Result<Vec<AnnotatedSnapshot>, CoreError> {
        let history = self.history.list().await?;
        let window = window.unwrap_or(self.settings.default_window);
        Ok(self.chart_service.filter_and_annotate_history(
            &history,
            window,
            &self.settings.visible_classes,
            as_of,
        ))
    }

    /// Revalue positions in bulk and record the month's snapshot.
    pub async fn monthly_update(&mut self, update: MonthlyUpdate) -> Result<PortfolioSnapshot, CoreError> {
        let snapshot = self
            .history_service
            .monthly_update(self.positions.as_mut(), self.history.as_mut(), update)
            .await?;
        self.dirty = true;
        Ok(snapshot)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Set the display currency (e.g., "PLN", "USD", "EUR").
    /// Currency code must be a 3-letter alphabetic string.
    pub fn set_display_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        services::portfolio_service::validate_currency(&trimmed)?;
        self.settings.display_currency = trimmed;
        self.dirty = true;
        Ok(())
    }

    /// Set how many positions the performer rankings show (at least 1).
    pub fn set_performer_count(&mut self, count: usize) -> Result<(), CoreError> {
        if count == 0 {
            return Err(CoreError::ValidationError(
                "Performer count must be at least 1".into(),
            ));
        }
        self.settings.performer_count = count;
        self.dirty = true;
        Ok(())
    }

    /// Set the lookback window the history chart opens with.
    pub fn set_default_window(&mut self, window: LookbackWindow) {
        self.settings.default_window = window;
        self.dirty = true;
    }

    /// Show or hide class series on the history chart.
    pub fn set_visible_classes(&mut self, visibility: ClassVisibility) {
        debug!("History chart visibility: {visibility:?}");
        self.settings.visible_classes = visibility;
        self.dirty = true;
    }

    /// Returns `true` if anything changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
