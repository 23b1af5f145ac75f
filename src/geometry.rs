use std::ops::{Add, Sub};

/// A point in raster space: pixel units, Y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `lambda` along the line from `self` to `other`.
    pub fn lerp(self, other: Point, lambda: f64) -> Point {
        Point::new(
            self.x + lambda * (other.x - self.x),
            self.y + lambda * (other.y - self.y),
        )
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// One piece of a closed curve, ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Two straight lines meeting at `corner`.
    Corner { corner: Point, end: Point },
    /// A cubic Bézier with control points `c1` and `c2`.
    Smooth { c1: Point, c2: Point, end: Point },
}

impl Segment {
    pub fn end(&self) -> Point {
        match self {
            Segment::Corner { end, .. } | Segment::Smooth { end, .. } => *end,
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(self, Segment::Corner { .. })
    }

    /// Every point stored in the segment, in drawing order.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Segment::Corner { corner, end } => vec![corner, end],
            Segment::Smooth { c1, c2, end } => vec![c1, c2, end],
        }
    }
}

/// A closed contour: start point followed by segments that lead back to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub start: Point,
    pub segments: Vec<Segment>,
}

impl Curve {
    pub fn new(start: Point, segments: Vec<Segment>) -> Self {
        Self { start, segments }
    }

    /// Axis-aligned box around the start point and every control point.
    pub fn control_bounds(&self) -> (Point, Point) {
        let mut min = self.start;
        let mut max = self.start;
        for p in self.segments.iter().flat_map(Segment::points) {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        (min, max)
    }
}

/// The traced outline of one image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorPath {
    pub curves: Vec<Curve>,
}

impl VectorPath {
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn segment_count(&self) -> usize {
        self.curves.iter().map(|c| c.segments.len()).sum()
    }
}
