use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analytics::GainLoss;
use super::asset_class::AssetClass;

/// A single tracked holding.
///
/// **Important**: `market_value` is the authoritative current value of the
/// whole holding. It is entered independently and is NOT `units × current_price`;
/// the two may diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier, assigned on creation
    pub id: Uuid,

    /// Display label (non-empty)
    pub name: String,

    /// Category bucket used for aggregation
    pub asset_class: AssetClass,

    /// Currency code, uppercased. Display only; no conversion is performed.
    pub currency: String,

    /// Quantity held (non-negative)
    pub units: f64,

    /// Price per unit at purchase, if known
    #[serde(default)]
    pub buying_price: Option<f64>,

    /// Current total value of the holding
    pub market_value: f64,

    /// Current price per unit, if known
    #[serde(default)]
    pub current_price: Option<f64>,

    /// Interest accrued but not yet paid. Only meaningful for bonds.
    #[serde(default)]
    pub accrued_interest: f64,

    /// Broker / platform the holding sits with
    #[serde(default)]
    pub source: Option<String>,

    /// Date of the last create/edit
    pub updated_at: NaiveDate,
}

impl Position {
    /// Build a new position from a form draft with a fresh id.
    pub fn from_draft(draft: PositionDraft, today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            asset_class: draft.asset_class.normalized(),
            currency: draft.currency.trim().to_uppercase(),
            units: draft.units,
            buying_price: draft.buying_price,
            market_value: draft.market_value,
            current_price: draft.current_price,
            accrued_interest: draft.accrued_interest,
            source: draft.source,
            updated_at: today,
        }
    }

    /// Cost basis: `units × buying_price`. A missing buying price counts as 0.
    pub fn total_cost(&self) -> f64 {
        self.units * self.buying_price.unwrap_or(0.0)
    }

    /// Gain/loss against cost basis. See [`GainLoss::compute`].
    pub fn gain_loss(&self) -> GainLoss {
        GainLoss::compute(self.units, self.buying_price.unwrap_or(0.0), self.market_value)
    }

    /// Merge an edit into this position. Fields absent from the patch are kept.
    pub fn apply_patch(&mut self, patch: PositionPatch, today: NaiveDate) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(asset_class) = patch.asset_class {
            self.asset_class = asset_class.normalized();
        }
        if let Some(currency) = patch.currency {
            self.currency = currency.trim().to_uppercase();
        }
        if let Some(units) = patch.units {
            self.units = units;
        }
        if let Some(buying_price) = patch.buying_price {
            self.buying_price = Some(buying_price);
        }
        if let Some(market_value) = patch.market_value {
            self.market_value = market_value;
        }
        if let Some(current_price) = patch.current_price {
            self.current_price = Some(current_price);
        }
        if let Some(accrued_interest) = patch.accrued_interest {
            self.accrued_interest = accrued_interest;
        }
        if let Some(source) = patch.source {
            self.source = Some(source);
        }
        self.updated_at = today;
    }
}

/// Payload of the "add position" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDraft {
    pub name: String,
    pub asset_class: AssetClass,
    pub currency: String,
    pub units: f64,
    #[serde(default)]
    pub buying_price: Option<f64>,
    pub market_value: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub accrued_interest: f64,
    #[serde(default)]
    pub source: Option<String>,
}

impl PositionDraft {
    /// Minimal draft; optional fields start empty.
    pub fn new(
        name: impl Into<String>,
        asset_class: AssetClass,
        currency: impl Into<String>,
        units: f64,
        market_value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            asset_class,
            currency: currency.into(),
            units,
            buying_price: None,
            market_value,
            current_price: None,
            accrued_interest: 0.0,
            source: None,
        }
    }

    pub fn with_buying_price(mut self, buying_price: f64) -> Self {
        self.buying_price = Some(buying_price);
        self
    }

    pub fn with_current_price(mut self, current_price: f64) -> Self {
        self.current_price = Some(current_price);
        self
    }

    pub fn with_accrued_interest(mut self, accrued_interest: f64) -> Self {
        self.accrued_interest = accrued_interest;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Payload of the "edit position" form. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub asset_class: Option<AssetClass>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub units: Option<f64>,
    #[serde(default)]
    pub buying_price: Option<f64>,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub accrued_interest: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
}

impl PositionPatch {
    /// Patch that only revalues the holding, as the monthly update does.
    pub fn market_value(market_value: f64) -> Self {
        Self {
            market_value: Some(market_value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
