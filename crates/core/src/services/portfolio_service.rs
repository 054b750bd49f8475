use chrono::NaiveDate;
use log::{debug, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset_class::AssetClass;
use crate::models::position::{Position, PositionDraft, PositionPatch};
use crate::stores::traits::PositionStore;

/// Manages holdings: validates form input and applies create/edit/delete
/// against a [`PositionStore`].
///
/// Validation is the boundary that guarantees the calculation services only
/// ever see finite, non-negative numbers.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a draft and store it as a new position with a fresh id.
    pub async fn add_position(
        &self,
        store: &mut dyn PositionStore,
        draft: PositionDraft,
        today: NaiveDate,
    ) -> Result<Position, CoreError> {
        let position = Position::from_draft(draft, today);
        self.validate_position(&position)?;
        store.upsert(position.clone()).await?;
        debug!("Added position {} ({}) to {} store", position.id, position.name, store.name());
        Ok(position)
    }

    /// Merge an edit into an existing position. Fields absent from the patch
    /// are preserved. Nothing is written if the merged position is invalid.
    pub async fn update_position(
        &self,
        store: &mut dyn PositionStore,
        id: Uuid,
        patch: PositionPatch,
        today: NaiveDate,
    ) -> Result<Position, CoreError> {
        let mut position = store
            .get(id)
            .await?
            .ok_or_else(|| CoreError::PositionNotFound(id.to_string()))?;

        position.apply_patch(patch, today);
        self.validate_position(&position)?;
        store.upsert(position.clone()).await?;
        debug!("Updated position {id}");
        Ok(position)
    }

    /// Delete a position by id.
    pub async fn remove_position(&self, store: &mut dyn PositionStore, id: Uuid) -> Result<(), CoreError> {
        if !store.remove(id).await? {
            warn!("Tried to remove unknown position {id}");
            return Err(CoreError::PositionNotFound(id.to_string()));
        }
        debug!("Removed position {id}");
        Ok(())
    }

    /// Validate a position before it is written.
    ///
    /// Rules:
    /// - Name must not be blank
    /// - Asset class must not be blank
    /// - Currency must be exactly 3 ASCII letters
    /// - Units, prices, market value and accrued interest must be finite and ≥ 0
    pub fn validate_position(&self, position: &Position) -> Result<(), CoreError> {
        if position.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Position name must not be empty".into()));
        }

        if let AssetClass::Other(raw) = &position.asset_class {
            if raw.trim().is_empty() {
                return Err(CoreError::ValidationError("Asset class must not be empty".into()));
            }
        }

        validate_currency(&position.currency)?;

        check_amount("units", position.units)?;
        check_amount("market value", position.market_value)?;
        check_amount("accrued interest", position.accrued_interest)?;
        if let Some(buying_price) = position.buying_price {
            check_amount("buying price", buying_price)?;
        }
        if let Some(current_price) = position.current_price {
            check_amount("current price", current_price)?;
        }

        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

/// Currency code must be a 3-letter alphabetic string.
pub(crate) fn validate_currency(currency: &str) -> Result<(), CoreError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., USD, EUR, PLN)"
        )));
    }
    Ok(())
}

pub(crate) fn check_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::ValidationError(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(CoreError::ValidationError(format!("{field} must not be negative (got {value})")));
    }
    Ok(())
}
