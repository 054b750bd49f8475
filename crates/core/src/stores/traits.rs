use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::snapshot::PortfolioSnapshot;

/// Holds the current list of holdings.
///
/// Backends may sit behind a network (the hosted document database), so
/// every call is async and may fail with `CoreError::Store`. The calculation
/// services never talk to a store directly; they receive plain slices.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PositionStore: Send + Sync {
    /// Backend name (for logs/errors).
    fn name(&self) -> &str;

    /// All positions. Order carries no meaning beyond being stable.
    async fn list(&self) -> Result<Vec<Position>, CoreError>;

    /// A single position by id.
    async fn get(&self, id: Uuid) -> Result<Option<Position>, CoreError>;

    /// Insert a new position or replace the one with the same id.
    async fn upsert(&mut self, position: Position) -> Result<(), CoreError>;

    /// Delete by id. Returns `false` if nothing was stored under that id.
    async fn remove(&mut self, id: Uuid) -> Result<bool, CoreError>;
}

/// Append-only log of portfolio snapshots.
///
/// **Contract**: `list()` returns snapshots in ascending date order. The
/// history chart relies on it and does not re-sort.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HistoryStore: Send + Sync {
    /// Backend name (for logs/errors).
    fn name(&self) -> &str;

    /// All snapshots, oldest first.
    async fn list(&self) -> Result<Vec<PortfolioSnapshot>, CoreError>;

    /// The most recent snapshot, if any.
    async fn latest(&self) -> Result<Option<PortfolioSnapshot>, CoreError>;

    /// Append a snapshot. Snapshots are never edited or deleted afterwards.
    async fn append(&mut self, snapshot: PortfolioSnapshot) -> Result<(), CoreError>;
}
