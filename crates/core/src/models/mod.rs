pub mod analytics;
pub mod asset_class;
pub mod chart;
pub mod ledger;
pub mod position;
pub mod settings;
pub mod snapshot;
