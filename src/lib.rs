//! # Tier List Core
//!
//! Board model, drag-and-drop engine and persistence for tier list ranking
//! boards.
//!
//! Items are sorted from an unranked pool into ordered tiers by dragging.
//! Mouse drags and touch/pen drags share one state machine, every change is
//! saved as a JSON snapshot, and colors are derived deterministically from
//! labels. Rendering is left to the embedder: the crate only needs a
//! [`drag::layout::BoardLayout`] for hit testing and an
//! [`export::Renderer`] for image export.

pub mod app;
pub mod config;
pub mod domain;
pub mod drag;
pub mod error;
pub mod export;
pub mod persistence;
pub mod storage;

// Re-export commonly used types
pub use app::TierList;
pub use config::{ExportSettings, TierListConfig};
pub use domain::{
    board::{Board, Container, Item, ItemId, Tier, TierId},
    snapshot::{Snapshot, TierSnapshot},
};
pub use drag::{
    layout::{BoardLayout, LayoutSnapshot, Point, Rect},
    native::NativeEvent,
    pointer::{PointerEvent, PointerKind},
    CancelPolicy, DragController, DragKind, DragOutcome, DragPhase, DragSession, DragSubject,
    InputResponse, SessionToken,
};
pub use error::{Result, TierError};
pub use persistence::Persistence;
pub use storage::Storage;
