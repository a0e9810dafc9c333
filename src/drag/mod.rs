//! # Drag engine
//!
//! A single state machine for moving items between containers and
//! reordering tiers. Two input adapters feed it:
//!
//! - [`native::NativeDrag`] for platform drag-and-drop events, which start
//!   dragging immediately
//! - [`pointer::PointerDrag`] for touch and pen input, which arms a press
//!   first and only starts dragging once the pointer travels far enough
//!
//! Whichever adapter is used, at most one [`DragSession`] exists at a time
//! and the board is only mutated through [`DragController`]. Each claim of
//! the session issues a [`SessionToken`]; an adapter only steers or ends the
//! session while its token is the live one.

pub mod layout;
pub mod native;
pub mod pointer;

use crate::domain::{Board, Container, ItemId, TierId};
use layout::{BoardLayout, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What kind of thing is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Item,
    Tier,
}

/// The thing being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragSubject {
    Item(ItemId),
    Tier(TierId),
}

impl DragSubject {
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Item(_) => DragKind::Item,
            Self::Tier(_) => DragKind::Tier,
        }
    }
}

/// Where the drag state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// Press recorded, waiting for the pointer to cross the drag threshold
    Armed,
    Dragging,
}

/// What happens to a dragged tier when its gesture is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelPolicy {
    /// Put the tier back where the gesture started, like items
    #[default]
    Restore,
    /// Leave the tier wherever live reordering last put it
    KeepPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Item(Container, usize),
    Tier(usize),
}

/// Identifies one claim of the drag session. Adapters hold on to the token
/// they were issued and only act while it is still the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// The one in-progress drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    token: SessionToken,
    subject: DragSubject,
    pointer_offset: Point,
    pointer: Point,
    hover: Option<Container>,
    origin: Origin,
}

impl DragSession {
    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn kind(&self) -> DragKind {
        self.subject.kind()
    }

    pub fn subject(&self) -> DragSubject {
        self.subject
    }

    /// Offset from the dragged element's corner to the grab point
    pub fn pointer_offset(&self) -> Point {
        self.pointer_offset
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Container currently marked as the drop target (item sessions only)
    pub fn hover(&self) -> Option<Container> {
        self.hover
    }

    /// Where the floating copy of the dragged element should be drawn
    pub fn ghost_position(&self) -> Point {
        self.pointer - self.pointer_offset
    }
}

/// How a drag session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The gesture completed. `target` is the container an item landed in,
    /// or `None` for tier drags and item drops outside any container.
    Dropped {
        subject: DragSubject,
        target: Option<Container>,
    },
    Cancelled {
        subject: DragSubject,
    },
}

impl DragOutcome {
    pub fn subject(&self) -> DragSubject {
        match self {
            Self::Dropped { subject, .. } | Self::Cancelled { subject } => *subject,
        }
    }
}

/// What an input adapter did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    /// Nothing to do for this event
    Ignored,
    /// A touch or pen press is waiting for the drag threshold
    Armed,
    /// The adapter claimed the drag session
    Started,
    /// The live session moved; `reordered` reports a tier order change
    Moved { reordered: bool },
    /// The session ended and was released
    Finished(DragOutcome),
    /// The press could not become a drag because another session is live
    Rejected(DragSubject),
    /// A press released without ever dragging
    Tap(DragSubject),
}

/// Owns the exclusive drag session and applies its effects to a board
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
    tier_cancel: CancelPolicy,
    issued: u64,
}

impl DragController {
    pub fn new(tier_cancel: CancelPolicy) -> Self {
        Self {
            session: None,
            tier_cancel,
            issued: 0,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Token of the live session, if any
    pub fn session_token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(|session| session.token)
    }

    /// Whether `token` belongs to the live session
    pub fn holds(&self, token: SessionToken) -> bool {
        self.session_token() == Some(token)
    }

    /// Claims the drag session for `subject`.
    ///
    /// Returns false, leaving any live session untouched, if a session is
    /// already active or the subject is not on the board.
    pub fn begin_drag(
        &mut self,
        board: &Board,
        subject: DragSubject,
        pointer_origin: Point,
        pointer_offset: Point,
    ) -> bool {
        if let Some(active) = &self.session {
            debug!(
                requested = ?subject,
                active = ?active.subject,
                "drag rejected, session already active"
            );
            return false;
        }

        let origin = match subject {
            DragSubject::Item(id) => board
                .locate_item(id)
                .map(|(container, index)| Origin::Item(container, index)),
            DragSubject::Tier(id) => board.tier_index(id).map(Origin::Tier),
        };
        let Some(origin) = origin else {
            debug!(subject = ?subject, "drag rejected, subject not on board");
            return false;
        };

        self.issued = self.issued.wrapping_add(1);
        debug!(subject = ?subject, token = self.issued, "drag started");
        self.session = Some(DragSession {
            token: SessionToken(self.issued),
            subject,
            pointer_offset,
            pointer: pointer_origin,
            hover: None,
            origin,
        });
        true
    }

    /// Feeds a pointer position into the live session.
    ///
    /// Item sessions retarget their hover container from the layout. Tier
    /// sessions are reinserted live using the midpoint rule. Returns true
    /// when the board's tier order changed.
    pub fn update_drag(
        &mut self,
        board: &mut Board,
        pointer: Point,
        layout: &impl BoardLayout,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.pointer = pointer;

        match session.subject {
            DragSubject::Item(_) => {
                session.hover = layout.container_at(pointer);
                false
            }
            DragSubject::Tier(id) => {
                let index = reorder_index(board, id, pointer.y, layout);
                board.move_tier(id, index)
            }
        }
    }

    /// Marks `container` as the hover target. Ignored unless an item
    /// session is live.
    pub fn enter_container(&mut self, container: Container) -> bool {
        match self.session.as_mut() {
            Some(session) if session.kind() == DragKind::Item => {
                session.hover = Some(container);
                true
            }
            _ => false,
        }
    }

    /// Clears the hover mark if it is on `container`
    pub fn leave_container(&mut self, container: Container) {
        if let Some(session) = self.session.as_mut() {
            if session.hover == Some(container) {
                session.hover = None;
            }
        }
    }

    /// Ends the session with a drop.
    ///
    /// An item is appended to `target`, or to the last hovered container
    /// when no target is given; with neither it stays put. Tier sessions
    /// ignore `target` and keep their live position.
    pub fn resolve_drag(
        &mut self,
        board: &mut Board,
        target: Option<Container>,
    ) -> Option<DragOutcome> {
        let session = self.session.take()?;

        let outcome = match session.subject {
            DragSubject::Item(id) => {
                let landed = target
                    .or(session.hover)
                    .filter(|container| board.move_item(id, *container));
                DragOutcome::Dropped {
                    subject: session.subject,
                    target: landed,
                }
            }
            DragSubject::Tier(_) => DragOutcome::Dropped {
                subject: session.subject,
                target: None,
            },
        };

        debug!(outcome = ?outcome, "drag resolved");
        Some(outcome)
    }

    /// Ends the session without a drop, restoring the subject's position
    /// according to its kind and the configured tier policy
    pub fn cancel_drag(&mut self, board: &mut Board) -> Option<DragOutcome> {
        let session = self.session.take()?;

        match (session.subject, session.origin) {
            (DragSubject::Item(id), Origin::Item(container, index)) => {
                if board.locate_item(id) != Some((container, index)) {
                    board.move_item_to(id, container, index);
                }
            }
            (DragSubject::Tier(id), Origin::Tier(index)) => {
                if self.tier_cancel == CancelPolicy::Restore {
                    board.move_tier(id, index);
                }
            }
            _ => {}
        }

        debug!(subject = ?session.subject, "drag cancelled");
        Some(DragOutcome::Cancelled {
            subject: session.subject,
        })
    }
}

/// Index the dragged tier should occupy for a pointer at `pointer_y`.
///
/// The other tiers are scanned in board order; the dragged tier goes right
/// before the first one whose midpoint is below the pointer, or last if
/// there is none. Tiers the layout cannot measure are skipped.
pub fn reorder_index(
    board: &Board,
    dragged: TierId,
    pointer_y: f64,
    layout: &impl BoardLayout,
) -> usize {
    let mut candidates = board.tiers().iter().filter(|tier| tier.id() != dragged);
    let count = board.tiers().len().saturating_sub(1);

    candidates
        .position(|tier| {
            layout
                .tier_midpoint(tier.id())
                .is_some_and(|midpoint| midpoint > pointer_y)
        })
        .unwrap_or(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::{LayoutSnapshot, Rect};

    fn tier_names(board: &Board) -> Vec<&str> {
        board.tiers().iter().map(|tier| tier.name()).collect()
    }

    /// Tiers D, A, B, C with A, B, C centred at y = 10, 30, 50 and D far below
    fn stacked_board() -> (Board, LayoutSnapshot) {
        let board = Board::with_default_tiers("t", &["D", "A", "B", "C"]);
        let ids: Vec<_> = board.tiers().iter().map(|tier| tier.id()).collect();
        let layout = LayoutSnapshot::new()
            .with_tier_row(ids[1], Rect::new(0.0, 0.0, 100.0, 20.0))
            .with_tier_row(ids[2], Rect::new(0.0, 20.0, 100.0, 20.0))
            .with_tier_row(ids[3], Rect::new(0.0, 40.0, 100.0, 20.0))
            .with_tier_row(ids[0], Rect::new(0.0, 100.0, 100.0, 20.0));
        (board, layout)
    }

    fn pool_layout(board: &Board) -> LayoutSnapshot {
        let mut layout = LayoutSnapshot::new()
            .with_container(Container::Pool, Rect::new(0.0, 200.0, 100.0, 50.0));
        for (row, tier) in board.tiers().iter().enumerate() {
            layout = layout.with_container(
                Container::Tier(tier.id()),
                Rect::new(0.0, row as f64 * 20.0, 100.0, 20.0),
            );
        }
        layout
    }

    #[test]
    fn test_midpoint_rule_inserts_before_first_lower_midpoint() {
        let (mut board, layout) = stacked_board();
        let d = board.tiers()[0].id();
        let mut controller = DragController::default();

        assert!(controller.begin_drag(
            &board,
            DragSubject::Tier(d),
            Point::new(5.0, 110.0),
            Point::ZERO
        ));
        assert!(controller.update_drag(&mut board, Point::new(5.0, 28.0), &layout));
        assert_eq!(tier_names(&board), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_midpoint_rule_appends_when_pointer_below_all() {
        let (mut board, layout) = stacked_board();
        let d = board.tiers()[0].id();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Tier(d), Point::ZERO, Point::ZERO);
        controller.update_drag(&mut board, Point::new(5.0, 75.0), &layout);
        assert_eq!(tier_names(&board), vec!["A", "B", "C", "D"]);

        controller.update_drag(&mut board, Point::new(5.0, 2.0), &layout);
        assert_eq!(tier_names(&board), vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn test_tier_drop_keeps_live_position() {
        let (mut board, layout) = stacked_board();
        let d = board.tiers()[0].id();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Tier(d), Point::ZERO, Point::ZERO);
        controller.update_drag(&mut board, Point::new(5.0, 45.0), &layout);
        let outcome = controller.resolve_drag(&mut board, Some(Container::Pool)).unwrap();

        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                subject: DragSubject::Tier(d),
                target: None
            }
        );
        assert_eq!(tier_names(&board), vec!["A", "B", "D", "C"]);
        assert!(!controller.is_active());
    }

    #[test]
    fn test_tier_cancel_restores_by_default() {
        let (mut board, layout) = stacked_board();
        let d = board.tiers()[0].id();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Tier(d), Point::ZERO, Point::ZERO);
        controller.update_drag(&mut board, Point::new(5.0, 45.0), &layout);
        controller.cancel_drag(&mut board);

        assert_eq!(tier_names(&board), vec!["D", "A", "B", "C"]);
        assert!(!controller.is_active());
    }

    #[test]
    fn test_tier_cancel_can_keep_position() {
        let (mut board, layout) = stacked_board();
        let d = board.tiers()[0].id();
        let mut controller = DragController::new(CancelPolicy::KeepPosition);

        controller.begin_drag(&board, DragSubject::Tier(d), Point::ZERO, Point::ZERO);
        controller.update_drag(&mut board, Point::new(5.0, 45.0), &layout);
        controller.cancel_drag(&mut board);

        assert_eq!(tier_names(&board), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_item_drop_appends_to_hover_target() {
        let mut board = Board::with_default_tiers("t", &["S", "A"]);
        let s = Container::Tier(board.tiers()[0].id());
        let existing = board.add_item("existing").unwrap();
        board.move_item(existing, s);
        let item = board.add_item("new").unwrap();
        let layout = pool_layout(&board);
        let mut controller = DragController::default();

        assert!(controller.begin_drag(
            &board,
            DragSubject::Item(item),
            Point::new(5.0, 210.0),
            Point::ZERO
        ));
        assert!(!controller.update_drag(&mut board, Point::new(5.0, 10.0), &layout));
        assert_eq!(controller.session().unwrap().hover(), Some(s));
        // Hovering alone does not move the item
        assert_eq!(board.locate_item(item), Some((Container::Pool, 0)));

        let outcome = controller.resolve_drag(&mut board, None).unwrap();
        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                subject: DragSubject::Item(item),
                target: Some(s)
            }
        );
        assert_eq!(board.locate_item(item), Some((s, 1)));
    }

    #[test]
    fn test_item_drop_without_target_is_noop() {
        let mut board = Board::with_default_tiers("t", &["S"]);
        let item = board.add_item("a").unwrap();
        let layout = pool_layout(&board);
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO);
        controller.update_drag(&mut board, Point::new(5.0, 10.0), &layout);
        // Leaving every container clears the hover mark
        controller.update_drag(&mut board, Point::new(500.0, 500.0), &layout);
        let outcome = controller.resolve_drag(&mut board, None).unwrap();

        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                subject: DragSubject::Item(item),
                target: None
            }
        );
        assert_eq!(board.locate_item(item), Some((Container::Pool, 0)));
    }

    #[test]
    fn test_explicit_target_wins_over_hover() {
        let mut board = Board::with_default_tiers("t", &["S", "A"]);
        let s = Container::Tier(board.tiers()[0].id());
        let a = Container::Tier(board.tiers()[1].id());
        let item = board.add_item("a").unwrap();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO);
        controller.enter_container(s);
        controller.resolve_drag(&mut board, Some(a));

        assert_eq!(board.locate_item(item), Some((a, 0)));
    }

    #[test]
    fn test_leave_clears_only_matching_hover() {
        let mut board = Board::with_default_tiers("t", &["S"]);
        let s = Container::Tier(board.tiers()[0].id());
        let item = board.add_item("a").unwrap();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO);
        controller.enter_container(s);
        controller.leave_container(Container::Pool);
        assert_eq!(controller.session().unwrap().hover(), Some(s));
        controller.leave_container(s);
        assert_eq!(controller.session().unwrap().hover(), None);
    }

    #[test]
    fn test_drop_into_deleted_tier_leaves_item() {
        let mut board = Board::with_default_tiers("t", &["S"]);
        let s = board.tiers()[0].id();
        let item = board.add_item("a").unwrap();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO);
        controller.enter_container(Container::Tier(s));
        board.delete_tier(s);
        let outcome = controller.resolve_drag(&mut board, None).unwrap();

        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                subject: DragSubject::Item(item),
                target: None
            }
        );
        assert_eq!(board.locate_item(item), Some((Container::Pool, 0)));
    }

    #[test]
    fn test_item_cancel_restores_position() {
        let mut board = Board::with_default_tiers("t", &["S"]);
        let s = Container::Tier(board.tiers()[0].id());
        let first = board.add_item("a").unwrap();
        let second = board.add_item("b").unwrap();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Item(first), Point::ZERO, Point::ZERO);
        // Something else moved the subject while it was in flight
        board.move_item(first, s);
        let outcome = controller.cancel_drag(&mut board).unwrap();

        assert_eq!(
            outcome,
            DragOutcome::Cancelled {
                subject: DragSubject::Item(first)
            }
        );
        assert_eq!(board.locate_item(first), Some((Container::Pool, 0)));
        assert_eq!(board.locate_item(second), Some((Container::Pool, 1)));
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let mut board = Board::with_default_tiers("t", &["S"]);
        let tier = board.tiers()[0].id();
        let item = board.add_item("a").unwrap();
        let mut controller = DragController::default();

        assert!(controller.begin_drag(
            &board,
            DragSubject::Item(item),
            Point::new(1.0, 2.0),
            Point::ZERO
        ));
        controller.enter_container(Container::Tier(tier));
        let before = controller.session().cloned();

        assert!(!controller.begin_drag(&board, DragSubject::Tier(tier), Point::ZERO, Point::ZERO));
        assert_eq!(controller.session().cloned(), before);
        assert_eq!(controller.session().unwrap().kind(), DragKind::Item);
    }

    #[test]
    fn test_tier_session_ignores_item_hover() {
        let board = Board::with_default_tiers("t", &["S"]);
        let tier = board.tiers()[0].id();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Tier(tier), Point::ZERO, Point::ZERO);
        assert!(!controller.enter_container(Container::Pool));
        assert_eq!(controller.session().unwrap().hover(), None);
    }

    #[test]
    fn test_begin_rejects_unknown_subject() {
        let mut board = Board::new("t");
        let item = board.add_item("a").unwrap();
        board.delete_item(item);
        let mut controller = DragController::default();

        assert!(!controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_resolve_and_cancel_without_session() {
        let mut board = Board::new("t");
        let mut controller = DragController::default();
        assert!(controller.resolve_drag(&mut board, None).is_none());
        assert!(controller.cancel_drag(&mut board).is_none());
    }

    #[test]
    fn test_each_session_gets_a_fresh_token() {
        let mut board = Board::new("t");
        let item = board.add_item("a").unwrap();
        let mut controller = DragController::default();

        controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO);
        let first = controller.session_token().unwrap();
        assert!(controller.holds(first));
        controller.cancel_drag(&mut board);
        assert!(!controller.holds(first));

        controller.begin_drag(&board, DragSubject::Item(item), Point::ZERO, Point::ZERO);
        let second = controller.session_token().unwrap();
        assert_ne!(first, second);
        assert!(!controller.holds(first));
        assert!(controller.holds(second));
    }

    #[test]
    fn test_ghost_position_follows_pointer() {
        let mut board = Board::new("t");
        let item = board.add_item("a").unwrap();
        let mut controller = DragController::default();

        controller.begin_drag(
            &board,
            DragSubject::Item(item),
            Point::new(10.0, 10.0),
            Point::new(4.0, 3.0),
        );
        let layout = LayoutSnapshot::new();
        controller.update_drag(&mut board, Point::new(50.0, 60.0), &layout);
        assert_eq!(
            controller.session().unwrap().ghost_position(),
            Point::new(46.0, 57.0)
        );
    }
}
