use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::snapshot::PortfolioSnapshot;

use super::traits::{HistoryStore, PositionStore};

/// In-process position store. Keeps insertion order; an upsert of an
/// existing id replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryPositionStore {
    positions: Vec<Position>,
}

impl MemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PositionStore for MemoryPositionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Position>, CoreError> {
        Ok(self.positions.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Position>, CoreError> {
        Ok(self.positions.iter().find(|p| p.id == id).cloned())
    }

    async fn upsert(&mut self, position: Position) -> Result<(), CoreError> {
        match self.positions.iter_mut().find(|p| p.id == position.id) {
            Some(existing) => *existing = position,
            None => self.positions.push(position),
        }
        Ok(())
    }

    async fn remove(&mut self, id: Uuid) -> Result<bool, CoreError> {
        let before = self.positions.len();
        self.positions.retain(|p| p.id != id);
        Ok(self.positions.len() != before)
    }
}

/// In-process snapshot log, kept sorted by date.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    snapshots: Vec<PortfolioSnapshot>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from existing snapshots; they are sorted on the way in.
    pub fn with_snapshots(mut snapshots: Vec<PortfolioSnapshot>) -> Self {
        snapshots.sort_by_key(|s| s.date);
        Self { snapshots }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HistoryStore for MemoryHistoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<PortfolioSnapshot>, CoreError> {
        Ok(self.snapshots.clone())
    }

    async fn latest(&self) -> Result<Option<PortfolioSnapshot>, CoreError> {
        Ok(self.snapshots.last().cloned())
    }

    async fn append(&mut self, snapshot: PortfolioSnapshot) -> Result<(), CoreError> {
        // Binary insert keeps the log date-sorted even for back-dated appends
        let pos = self
            .snapshots
            .binary_search_by_key(&snapshot.date, |s| s.date)
            .unwrap_or_else(|pos| pos);
        self.snapshots.insert(pos, snapshot);
        Ok(())
    }
}
