use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Compute the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            return 0.0;
        }
        self.width / self.height
    }

    /// True when either side is zero or negative.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Rectangle of `size` centered on `center`.
    pub fn from_center(center: Point2D, size: Size2D) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Half-open containment test.
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Intersection with another rectangle, if non-empty.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// A center-anchored similarity transform: uniform scale and rotation about
/// `position`, which is where the local origin lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Where the local origin lands.
    pub position: Point2D,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees, clockwise in a y-down space.
    pub rotation: f64,
}

impl Transform2D {
    /// Identity transform: no translation, scale 1, no rotation.
    pub fn identity() -> Self {
        Self {
            position: Point2D::zero(),
            scale: 1.0,
            rotation: 0.0,
        }
    }

    pub fn new(position: Point2D, scale: f64, rotation: f64) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Map a local point (relative to the anchor) to the target space.
    pub fn apply(&self, local: Point2D) -> Point2D {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let x = local.x * self.scale;
        let y = local.y * self.scale;
        Point2D::new(
            self.position.x + x * cos - y * sin,
            self.position.y + x * sin + y * cos,
        )
    }

    /// Map a target-space point back to local coordinates.
    /// Returns None for a degenerate (zero-scale) transform.
    pub fn invert(&self, p: Point2D) -> Option<Point2D> {
        if self.scale.abs() < f64::EPSILON {
            return None;
        }
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = p.x - self.position.x;
        let dy = p.y - self.position.y;
        let x = dx * cos + dy * sin;
        let y = -dx * sin + dy * cos;
        Some(Point2D::new(x / self.scale, y / self.scale))
    }

    /// Axis-aligned bounds of a local rectangle after transformation.
    pub fn bounds_of(&self, local: &Rect) -> Rect {
        let corners = [
            Point2D::new(local.x, local.y),
            Point2D::new(local.right(), local.y),
            Point2D::new(local.x, local.bottom()),
            Point2D::new(local.right(), local.bottom()),
        ];
        let mut min = Point2D::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in corners {
            let p = self.apply(c);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
