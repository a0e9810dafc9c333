pub mod board;
pub mod color;
pub mod snapshot;

pub use board::{Board, Container, Item, ItemId, Tier, TierId};
pub use color::{Gradient, Hsl};
pub use snapshot::{Snapshot, TierSnapshot};
