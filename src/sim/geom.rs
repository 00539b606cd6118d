//! Grid geometry: facings, pixel rectangles and silhouette masks
//!
//! All positions are integer pixels with the origin at the arena's top-left
//! corner and y growing downward.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One of the four cardinal facings. Declaration order is clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Unit vector in screen space
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Up => IVec2::new(0, -1),
        }
    }

    /// Rotate 90° clockwise
    pub fn clockwise(self) -> Self {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }

    /// Rotate 180°
    pub fn reversed(self) -> Self {
        self.clockwise().clockwise()
    }

    /// Index in clockwise order, for picking a facing from a random roll
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Axis-aligned pixel rectangle. `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of edge `size` anchored at `pos`
    pub fn square(pos: IVec2, size: i32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn translated(&self, by: IVec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True if `other` lies entirely inside `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.left() <= other.left()
            && other.right() <= self.right()
            && self.top() <= other.top()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Per-pixel silhouette used for tank-vs-tank contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    size: i32,
    bits: Vec<bool>,
}

impl Mask {
    /// Tank silhouette of edge `size` pointing along `facing`.
    ///
    /// Two treads run the full hull length, the turret block sits between
    /// them, and the barrel sticks out of the front. The two front corners
    /// beside the barrel stay empty, so tanks meeting nose-to-nose at an
    /// angle can pass where their bounding boxes would already touch.
    pub fn tank(size: i32, facing: Direction) -> Self {
        let n = size.max(1);
        let mut bits = vec![false; (n * n) as usize];
        for row in 0..n {
            for col in 0..n {
                // Shape is authored facing up, then rotated
                let (u, v) = match facing {
                    Direction::Up => (col, row),
                    Direction::Down => (n - 1 - col, n - 1 - row),
                    Direction::Right => (row, n - 1 - col),
                    Direction::Left => (n - 1 - row, col),
                };
                bits[(row * n + col) as usize] = Self::tank_up_bit(n, u, v);
            }
        }
        Self { size: n, bits }
    }

    fn tank_up_bit(n: i32, u: i32, v: i32) -> bool {
        let tread = u < n / 4 || u >= n - n / 4;
        let hull = v >= n / 6;
        let turret = v >= n / 3;
        let barrel = u >= n * 5 / 12 && u < n * 7 / 12;
        (tread && hull) || turret || barrel
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Pixel test in mask-local coordinates; outside the mask is empty
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.size || y >= self.size {
            return false;
        }
        self.bits[(y * self.size + x) as usize]
    }

    /// True if this mask placed at `at` shares a set pixel with `other` at `other_at`
    pub fn overlaps(&self, at: IVec2, other: &Mask, other_at: IVec2) -> bool {
        let a = Rect::square(at, self.size);
        let b = Rect::square(other_at, other.size);
        let Some(shared) = a.intersection(&b) else {
            return false;
        };
        for y in shared.top()..shared.bottom() {
            for x in shared.left()..shared.right() {
                if self.get(x - at.x, y - at.y) && other.get(x - other_at.x, y - other_at.y) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_rotation() {
        assert_eq!(Direction::Right.clockwise(), Direction::Down);
        assert_eq!(Direction::Up.clockwise(), Direction::Right);
        for dir in Direction::ALL {
            assert_eq!(dir.reversed().reversed(), dir);
            assert_eq!(dir.delta() + dir.reversed().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_rect_edge_contact_is_not_overlap() {
        let a = Rect::new(0, 0, 30, 30);
        let b = Rect::new(30, 0, 30, 30);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(29, 29, 5, 5)));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 30, 30);
        let b = Rect::new(20, 10, 30, 30);
        assert_eq!(a.intersection(&b), Some(Rect::new(20, 10, 10, 20)));
        assert!(Rect::new(0, 0, 780, 780).contains_rect(&a));
    }

    #[test]
    fn test_mask_front_corners_empty() {
        let mask = Mask::tank(60, Direction::Up);
        assert!(!mask.get(20, 0)); // beside the barrel
        assert!(mask.get(30, 0)); // barrel tip
        assert!(mask.get(0, 59)); // rear tread
        let right = Mask::tank(60, Direction::Right);
        assert!(right.get(59, 30)); // barrel now points right
        assert!(!right.get(59, 20));
    }

    #[test]
    fn test_mask_overlap_is_finer_than_bounds() {
        // Two tanks facing up, side by side, boxes overlapping only in
        // the top corner band where neither silhouette has pixels.
        let a = Mask::tank(60, Direction::Up);
        let b = Mask::tank(60, Direction::Down);
        // b's empty corners are at its bottom; place it so only a's empty
        // top corners meet b's empty bottom corners.
        let at = IVec2::new(0, 0);
        let other_at = IVec2::new(50, -55);
        assert!(Rect::square(at, 60).intersects(&Rect::square(other_at, 60)));
        assert!(!a.overlaps(at, &b, other_at));
        // Full overlap always collides
        assert!(a.overlaps(at, &b, IVec2::new(10, 0)));
    }
}
