//! Drag emulation for touch and pen pointers.
//!
//! A press is armed first and only claims the drag session once the pointer
//! has travelled `threshold` pixels from where it went down, so taps and
//! small jitters never start a drag. Mouse pointers are left to the native
//! adapter.

use crate::{
    domain::Board,
    drag::{
        layout::{BoardLayout, Point},
        DragController, DragPhase, DragSubject, InputResponse, SessionToken,
    },
};
use tracing::debug;

/// Default distance, in pixels, a press must travel before it drags
pub const DEFAULT_DRAG_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// A pointer event routed to a draggable element or the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pointer_id: u32,
        kind: PointerKind,
        subject: DragSubject,
        position: Point,
    },
    Move {
        pointer_id: u32,
        position: Point,
    },
    Up {
        pointer_id: u32,
        position: Point,
    },
    Cancel {
        pointer_id: u32,
    },
    LostCapture {
        pointer_id: u32,
    },
}

impl PointerEvent {
    fn pointer_id(&self) -> u32 {
        match self {
            Self::Down { pointer_id, .. }
            | Self::Move { pointer_id, .. }
            | Self::Up { pointer_id, .. }
            | Self::Cancel { pointer_id }
            | Self::LostCapture { pointer_id } => *pointer_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Idle,
    /// Press that can never become a drag; it ends as a tap
    Inert { pointer_id: u32, subject: DragSubject },
    Armed {
        pointer_id: u32,
        subject: DragSubject,
        origin: Point,
    },
    Dragging {
        pointer_id: u32,
        token: SessionToken,
    },
}

/// Tracks one touch or pen press through armed and dragging phases
#[derive(Debug, Clone)]
pub struct PointerDrag {
    threshold: f64,
    press: Press,
}

impl Default for PointerDrag {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl PointerDrag {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            press: Press::Idle,
        }
    }

    pub fn phase(&self) -> DragPhase {
        match self.press {
            Press::Idle | Press::Inert { .. } => DragPhase::Idle,
            Press::Armed { .. } => DragPhase::Armed,
            Press::Dragging { .. } => DragPhase::Dragging,
        }
    }

    /// Drops the press in progress without touching the controller
    pub fn reset(&mut self) {
        self.press = Press::Idle;
    }

    /// A dragging press whose session was ended elsewhere is over
    fn forget_stale_drag(&mut self, controller: &DragController) {
        if let Press::Dragging { pointer_id, token } = self.press {
            if !controller.holds(token) {
                debug!(pointer_id, "drag session ended elsewhere, press dropped");
                self.press = Press::Idle;
            }
        }
    }

    fn tracked_pointer(&self) -> Option<u32> {
        match self.press {
            Press::Idle => None,
            Press::Inert { pointer_id, .. }
            | Press::Armed { pointer_id, .. }
            | Press::Dragging { pointer_id, .. } => Some(pointer_id),
        }
    }

    pub fn handle(
        &mut self,
        controller: &mut DragController,
        board: &mut Board,
        event: PointerEvent,
        layout: &impl BoardLayout,
    ) -> InputResponse {
        self.forget_stale_drag(controller);

        if let PointerEvent::Down {
            pointer_id,
            kind,
            subject,
            position,
        } = event
        {
            return self.press(controller, pointer_id, kind, subject, position);
        }

        if self.tracked_pointer() != Some(event.pointer_id()) {
            return InputResponse::Ignored;
        }

        match event {
            PointerEvent::Down { .. } => InputResponse::Ignored,
            PointerEvent::Move { position, .. } => self.moved(controller, board, position, layout),
            PointerEvent::Up { position, .. } => self.released(controller, board, position, layout),
            PointerEvent::Cancel { .. } | PointerEvent::LostCapture { .. } => {
                let press = std::mem::replace(&mut self.press, Press::Idle);
                match press {
                    Press::Dragging { .. } => controller
                        .cancel_drag(board)
                        .map_or(InputResponse::Ignored, InputResponse::Finished),
                    _ => InputResponse::Ignored,
                }
            }
        }
    }

    fn press(
        &mut self,
        controller: &DragController,
        pointer_id: u32,
        kind: PointerKind,
        subject: DragSubject,
        position: Point,
    ) -> InputResponse {
        if kind == PointerKind::Mouse || self.press != Press::Idle {
            return InputResponse::Ignored;
        }

        if controller.is_active() {
            debug!(pointer_id, subject = ?subject, "press not armed, drag session busy");
            self.press = Press::Inert {
                pointer_id,
                subject,
            };
            return InputResponse::Rejected(subject);
        }

        self.press = Press::Armed {
            pointer_id,
            subject,
            origin: position,
        };
        InputResponse::Armed
    }

    fn moved(
        &mut self,
        controller: &mut DragController,
        board: &mut Board,
        position: Point,
        layout: &impl BoardLayout,
    ) -> InputResponse {
        match self.press {
            Press::Armed {
                pointer_id,
                subject,
                origin,
            } => {
                if origin.distance(position) < self.threshold {
                    return InputResponse::Ignored;
                }

                let offset = layout
                    .subject_origin(subject)
                    .map_or(Point::ZERO, |corner| origin - corner);
                if !controller.begin_drag(board, subject, origin, offset) {
                    self.press = Press::Inert {
                        pointer_id,
                        subject,
                    };
                    return InputResponse::Rejected(subject);
                }

                let Some(token) = controller.session_token() else {
                    return InputResponse::Ignored;
                };
                self.press = Press::Dragging { pointer_id, token };
                controller.update_drag(board, position, layout);
                InputResponse::Started
            }
            Press::Dragging { .. } => InputResponse::Moved {
                reordered: controller.update_drag(board, position, layout),
            },
            Press::Idle | Press::Inert { .. } => InputResponse::Ignored,
        }
    }

    fn released(
        &mut self,
        controller: &mut DragController,
        board: &mut Board,
        position: Point,
        layout: &impl BoardLayout,
    ) -> InputResponse {
        let press = std::mem::replace(&mut self.press, Press::Idle);
        match press {
            Press::Armed { subject, .. } | Press::Inert { subject, .. } => {
                InputResponse::Tap(subject)
            }
            Press::Dragging { .. } => {
                controller.update_drag(board, position, layout);
                controller
                    .resolve_drag(board, None)
                    .map_or(InputResponse::Ignored, InputResponse::Finished)
            }
            Press::Idle => InputResponse::Ignored,
        }
    }
}
