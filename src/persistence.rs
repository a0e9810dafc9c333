//! Saves and restores the board through a [`Storage`] backend.
//!
//! Persistence never fails loudly: write errors are logged and the board
//! carries on in memory, and anything unreadable on load is treated as if
//! nothing had been saved.

use crate::{
    config::TierListConfig,
    domain::{snapshot, Board, Snapshot},
    error::Result,
    storage::Storage,
};
use tracing::{debug, error, warn};

pub struct Persistence<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the full board snapshot. Returns false, after logging, if the
    /// write failed.
    pub async fn save(&self, board: &Board) -> bool {
        match self.try_save(board).await {
            Ok(()) => {
                debug!(key = %self.key, "board saved");
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "save failed");
                false
            }
        }
    }

    async fn try_save(&self, board: &Board) -> Result<()> {
        let json = snapshot::serialize(board).to_json()?;
        self.storage.set(&self.key, &json).await
    }

    /// Reads the saved board, or `None` if nothing usable is stored
    pub async fn load(&self, default_title: &str) -> Option<Board> {
        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(key = %self.key, error = %e, "load failed");
                return None;
            }
        };

        let restored = Snapshot::from_json(&raw)
            .and_then(|parsed| snapshot::restore(&parsed, default_title));
        match restored {
            Ok(board) => Some(board),
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding saved board");
                None
            }
        }
    }

    /// Loads the saved board, falling back to the configured default board,
    /// which is written back immediately
    pub async fn load_or_default(&self, config: &TierListConfig) -> Board {
        if let Some(board) = self.load(&config.default_title).await {
            return board;
        }

        let board = Board::with_default_tiers(
            config.default_title.clone(),
            config.default_tiers.as_slice(),
        );
        self.save(&board).await;
        board
    }
}
