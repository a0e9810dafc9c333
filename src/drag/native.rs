//! Adapter for platform drag-and-drop events (mouse drags).
//!
//! Native drags have no armed phase: `DragStart` claims the session at once.
//! Hover targets come from the drop zones themselves rather than hit testing.

use crate::{
    domain::{Board, Container},
    drag::{
        layout::{BoardLayout, Point},
        DragController, DragKind, DragSubject, InputResponse, SessionToken,
    },
};
use tracing::debug;

/// A platform drag-and-drop event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    DragStart {
        subject: DragSubject,
        pointer: Point,
    },
    /// Pointer moved over the board; `container` is the drop zone it is
    /// over, if any
    DragOver {
        container: Option<Container>,
        pointer: Point,
    },
    DragLeave {
        container: Container,
    },
    Drop {
        container: Option<Container>,
    },
    /// Fired last for every gesture, whether or not a drop happened
    DragEnd,
}

/// Routes native drag events into the controller.
///
/// Only the gesture whose `DragStart` claimed the session may steer or end
/// it; events from a gesture that was rejected are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDrag {
    owned: Option<SessionToken>,
}

impl NativeDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets any session this adapter claimed
    pub fn reset(&mut self) {
        self.owned = None;
    }

    fn owns(&self, controller: &DragController) -> bool {
        self.owned.is_some_and(|token| controller.holds(token))
    }

    pub fn handle(
        &mut self,
        controller: &mut DragController,
        board: &mut Board,
        event: NativeEvent,
        layout: &impl BoardLayout,
    ) -> InputResponse {
        if let NativeEvent::DragStart { subject, pointer } = event {
            let offset = layout
                .subject_origin(subject)
                .map_or(Point::ZERO, |origin| pointer - origin);
            if controller.begin_drag(board, subject, pointer, offset) {
                self.owned = controller.session_token();
                return InputResponse::Started;
            }
            debug!(subject = ?subject, "native drag not claimed");
            self.owned = None;
            return InputResponse::Rejected(subject);
        }

        if !self.owns(controller) {
            if matches!(event, NativeEvent::Drop { .. } | NativeEvent::DragEnd) {
                self.owned = None;
            }
            return InputResponse::Ignored;
        }

        match event {
            NativeEvent::DragStart { .. } => InputResponse::Ignored,
            NativeEvent::DragOver { container, pointer } => {
                match controller.session().map(|session| session.kind()) {
                    Some(DragKind::Item) => {
                        if let Some(container) = container {
                            controller.enter_container(container);
                        }
                        InputResponse::Moved { reordered: false }
                    }
                    Some(DragKind::Tier) => InputResponse::Moved {
                        reordered: controller.update_drag(board, pointer, layout),
                    },
                    None => InputResponse::Ignored,
                }
            }
            NativeEvent::DragLeave { container } => {
                controller.leave_container(container);
                InputResponse::Moved { reordered: false }
            }
            NativeEvent::Drop { container } => {
                self.owned = None;
                controller
                    .resolve_drag(board, container)
                    .map_or(InputResponse::Ignored, InputResponse::Finished)
            }
            NativeEvent::DragEnd => {
                self.owned = None;
                controller
                    .cancel_drag(board)
                    .map_or(InputResponse::Ignored, InputResponse::Finished)
            }
        }
    }
}
