//! Geometry the drag engine needs from whatever is drawing the board.

use crate::{
    domain::{Container, ItemId, TierId},
    drag::DragSubject,
};
use std::ops::Sub;

/// A position in board coordinates, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Hit testing and measurement for the rendered board
pub trait BoardLayout {
    /// The item container under `point`, if any
    fn container_at(&self, point: Point) -> Option<Container>;

    /// Vertical midpoint of a tier row as currently drawn
    fn tier_midpoint(&self, tier: TierId) -> Option<f64>;

    /// Top-left corner of a draggable element, used to keep the grab
    /// point stable under the pointer
    fn subject_origin(&self, _subject: DragSubject) -> Option<Point> {
        None
    }
}

/// Rectangles measured from the rendered board at one moment in time
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    containers: Vec<(Container, Rect)>,
    tier_rows: Vec<(TierId, Rect)>,
    items: Vec<(ItemId, Rect)>,
}

impl LayoutSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item drop zone. Later registrations win on overlap.
    pub fn with_container(mut self, container: Container, rect: Rect) -> Self {
        self.containers.push((container, rect));
        self
    }

    /// Registers the full row of a tier, used for reordering
    pub fn with_tier_row(mut self, tier: TierId, rect: Rect) -> Self {
        self.tier_rows.push((tier, rect));
        self
    }

    /// Registers the card of an item
    pub fn with_item(mut self, item: ItemId, rect: Rect) -> Self {
        self.items.push((item, rect));
        self
    }
}

impl BoardLayout for LayoutSnapshot {
    fn container_at(&self, point: Point) -> Option<Container> {
        self.containers
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(point))
            .map(|(container, _)| *container)
    }

    fn tier_midpoint(&self, tier: TierId) -> Option<f64> {
        self.tier_rows
            .iter()
            .find(|(id, _)| *id == tier)
            .map(|(_, rect)| rect.mid_y())
    }

    fn subject_origin(&self, subject: DragSubject) -> Option<Point> {
        match subject {
            DragSubject::Item(item) => self
                .items
                .iter()
                .find(|(id, _)| *id == item)
                .map(|(_, rect)| rect.origin()),
            DragSubject::Tier(tier) => self
                .tier_rows
                .iter()
                .find(|(id, _)| *id == tier)
                .map(|(_, rect)| rect.origin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Board;

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
        assert_eq!(Point::new(5.0, 7.0) - Point::new(2.0, 3.0), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.9, 9.9)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert_eq!(rect.mid_y(), 5.0);
    }

    #[test]
    fn test_layout_snapshot_hit_testing() {
        let mut board = Board::with_default_tiers("t", &["S", "A"]);
        let item = board.add_item("card").unwrap();
        let s = board.tiers()[0].id();
        let a = board.tiers()[1].id();
        let layout = LayoutSnapshot::new()
            .with_tier_row(s, Rect::new(0.0, 0.0, 100.0, 20.0))
            .with_tier_row(a, Rect::new(0.0, 20.0, 100.0, 20.0))
            .with_container(Container::Tier(s), Rect::new(20.0, 0.0, 80.0, 20.0))
            .with_container(Container::Tier(a), Rect::new(20.0, 20.0, 80.0, 20.0))
            .with_container(Container::Pool, Rect::new(0.0, 50.0, 100.0, 50.0))
            .with_item(item, Rect::new(2.0, 52.0, 30.0, 10.0));

        assert_eq!(layout.container_at(Point::new(30.0, 25.0)), Some(Container::Tier(a)));
        assert_eq!(layout.container_at(Point::new(30.0, 60.0)), Some(Container::Pool));
        // Tier label column is not a drop zone
        assert_eq!(layout.container_at(Point::new(5.0, 5.0)), None);
        assert_eq!(layout.tier_midpoint(a), Some(30.0));
        assert_eq!(
            layout.subject_origin(DragSubject::Tier(a)),
            Some(Point::new(0.0, 20.0))
        );
        assert_eq!(
            layout.subject_origin(DragSubject::Item(item)),
            Some(Point::new(2.0, 52.0))
        );
    }
}
