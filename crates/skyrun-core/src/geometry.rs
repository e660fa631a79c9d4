use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world units.
///
/// Coordinates follow screen convention: `x` grows to the right, `y` grows
/// downward, and `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Free-function form used by the resolver and dispatcher.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
        let inner = Aabb::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlaps(&outer, &inner));
    }

    #[test]
    fn edges() {
        let a = Aabb::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(a.left(), 2.0);
        assert_eq!(a.right(), 6.0);
        assert_eq!(a.top(), 3.0);
        assert_eq!(a.bottom(), 8.0);
        assert_eq!(a.center_x(), 4.0);
        assert_eq!(a.center_y(), 5.5);
    }

    #[test]
    fn nan_is_not_finite() {
        let a = Aabb::new(f32::NAN, 0.0, 1.0, 1.0);
        assert!(!a.is_finite());
        assert!(Aabb::new(0.0, 0.0, 1.0, 1.0).is_finite());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                ax in -100.0f32..100.0, ay in -100.0f32..100.0,
                bx in -100.0f32..100.0, by in -100.0f32..100.0,
                aw in 0.1f32..50.0, ah in 0.1f32..50.0,
                bw in 0.1f32..50.0, bh in 0.1f32..50.0,
            ) {
                let a = Aabb::new(ax, ay, aw, ah);
                let b = Aabb::new(bx, by, bw, bh);
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }
        }
    }
}
