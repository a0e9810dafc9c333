//! The tier list as a whole: board, drag engine, persistence and export
//! wired together.
//!
//! Every successful mutation is saved right away. Drag gestures save once,
//! when the session ends, rather than on every live reorder step.

use crate::{
    config::TierListConfig,
    domain::{snapshot, Board, ItemId, Snapshot, TierId},
    drag::{
        layout::BoardLayout,
        native::{NativeDrag, NativeEvent},
        pointer::{PointerDrag, PointerEvent},
        DragController, DragOutcome, DragPhase, DragSession, InputResponse,
    },
    error::Result,
    export::{self, ExportedImage, Renderer},
    persistence::Persistence,
    storage::Storage,
};
use tracing::debug;

pub struct TierList<S: Storage> {
    config: TierListConfig,
    board: Board,
    controller: DragController,
    native: NativeDrag,
    pointer: PointerDrag,
    persistence: Persistence<S>,
}

impl<S: Storage> TierList<S> {
    /// Opens the saved board, or starts from the configured default board
    pub async fn open(storage: S, config: TierListConfig) -> Self {
        let persistence = Persistence::new(storage, config.storage_key.clone());
        let board = persistence.load_or_default(&config).await;

        Self {
            controller: DragController::new(config.tier_cancel),
            native: NativeDrag::new(),
            pointer: PointerDrag::new(config.drag_threshold),
            board,
            persistence,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &TierListConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.controller.session()
    }

    /// Phase of the touch/pen press, if one is in progress
    pub fn pointer_phase(&self) -> DragPhase {
        self.pointer.phase()
    }

    async fn save(&self) {
        self.persistence.save(&self.board).await;
    }

    pub async fn add_item(&mut self, label: &str) -> Option<ItemId> {
        let id = self.board.add_item(label)?;
        self.save().await;
        Some(id)
    }

    pub async fn rename_item(&mut self, id: ItemId, label: &str) -> bool {
        let renamed = self.board.rename_item(id, label);
        if renamed {
            self.save().await;
        }
        renamed
    }

    pub async fn delete_item(&mut self, id: ItemId) -> bool {
        let deleted = self.board.delete_item(id).is_some();
        if deleted {
            self.save().await;
        }
        deleted
    }

    /// Removes every item, keeping the tiers
    pub async fn clear_items(&mut self) -> usize {
        let removed = self.board.clear_items();
        if removed > 0 {
            self.save().await;
        }
        removed
    }

    pub async fn add_tier(&mut self, name: &str) -> Option<TierId> {
        let id = self.board.add_tier(name)?;
        self.save().await;
        Some(id)
    }

    pub async fn rename_tier(&mut self, id: TierId, name: &str) -> bool {
        let renamed = self.board.rename_tier(id, name);
        if renamed {
            self.save().await;
        }
        renamed
    }

    pub async fn delete_tier(&mut self, id: TierId) -> bool {
        let deleted = self.board.delete_tier(id);
        if deleted {
            self.save().await;
        }
        deleted
    }

    /// Commits a title; blank text restores the default title
    pub async fn set_title(&mut self, text: &str) {
        self.board.set_title(text, &self.config.default_title);
        self.save().await;
    }

    /// Replaces the whole board with `snapshot`. On failure the current
    /// board is left untouched.
    pub async fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        let board = snapshot::restore(snapshot, &self.config.default_title)?;
        self.controller.cancel_drag(&mut self.board);
        self.release_adapters();
        self.board = board;
        self.save().await;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        snapshot::serialize(&self.board)
    }

    /// Routes a platform drag-and-drop event
    pub async fn handle_native(
        &mut self,
        event: NativeEvent,
        layout: &impl BoardLayout,
    ) -> InputResponse {
        let response = self
            .native
            .handle(&mut self.controller, &mut self.board, event, layout);
        self.after_input(response).await
    }

    /// Routes a touch or pen pointer event
    pub async fn handle_pointer(
        &mut self,
        event: PointerEvent,
        layout: &impl BoardLayout,
    ) -> InputResponse {
        let response = self
            .pointer
            .handle(&mut self.controller, &mut self.board, event, layout);
        self.after_input(response).await
    }

    /// Abandons any drag in progress, e.g. when the window loses focus
    pub async fn cancel_drag(&mut self) -> Option<DragOutcome> {
        let outcome = self.controller.cancel_drag(&mut self.board);
        self.release_adapters();
        let outcome = outcome?;
        self.save().await;
        Some(outcome)
    }

    fn release_adapters(&mut self) {
        self.native.reset();
        self.pointer.reset();
    }

    async fn after_input(&mut self, response: InputResponse) -> InputResponse {
        if let InputResponse::Finished(outcome) = response {
            debug!(outcome = ?outcome, "drag gesture committed");
            self.save().await;
        }
        response
    }

    /// Renders the board to an image named after the title
    pub async fn export(&self, renderer: &dyn Renderer) -> Result<ExportedImage> {
        export::export_board(&self.board, renderer, &self.config.export).await
    }
}
