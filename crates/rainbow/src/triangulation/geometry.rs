//! Planar predicates on index segments over a shared point set.

use std::fmt;

use nalgebra::Vector2;

/// Orientation tolerance: cross products below this count as collinear.
const COLLINEAR_EPS: f64 = 1e-12;

pub type Point = Vector2<f64>;

/// Straight segment between two points of a point set, stored as sorted
/// point indices. Equality is by index, never by coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    a: usize,
    b: usize,
}

impl Segment {
    pub fn new(i: usize, j: usize) -> Self {
        Self {
            a: i.min(j),
            b: i.max(j),
        }
    }

    pub fn endpoints(self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn shares_endpoint(self, other: Segment) -> bool {
        self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let cross = (q - p).perp(&(r - q));
    if cross.abs() <= COLLINEAR_EPS {
        Orientation::Collinear
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// `x` lies in the bounding box of `p`–`r` (callers ensure collinearity).
fn within_box(x: Point, p: Point, r: Point) -> bool {
    x.x <= p.x.max(r.x) && x.x >= p.x.min(r.x) && x.y <= p.y.max(r.y) && x.y >= p.y.min(r.y)
}

/// Do `s` and `t` cross? Distinct segments meeting only at a shared endpoint
/// do not; collinear overlap and touching an interior point do.
pub fn segments_intersect(points: &[Point], s: Segment, t: Segment) -> bool {
    if s != t && s.shares_endpoint(t) {
        return false;
    }
    let (p1, q1) = (points[s.a], points[s.b]);
    let (p2, q2) = (points[t.a], points[t.b]);
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == Orientation::Collinear && within_box(p2, p1, q1))
        || (o2 == Orientation::Collinear && within_box(q2, p1, q1))
        || (o3 == Orientation::Collinear && within_box(p1, p2, q2))
        || (o4 == Orientation::Collinear && within_box(q1, p2, q2))
}

/// Vertices of a regular `n`-gon on the unit circle, counterclockwise from (1, 0).
pub fn convex_polygon(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let th = std::f64::consts::TAU * i as f64 / n as f64;
            Point::new(th.cos(), th.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn diagonals_of_square_cross() {
        let p = square();
        assert!(segments_intersect(&p, Segment::new(0, 2), Segment::new(1, 3)));
        assert!(segments_intersect(&p, Segment::new(3, 1), Segment::new(2, 0)));
        // sides meet only at corners
        assert!(!segments_intersect(&p, Segment::new(0, 1), Segment::new(1, 2)));
        assert!(!segments_intersect(&p, Segment::new(0, 1), Segment::new(2, 3)));
        // a segment overlaps itself
        assert!(segments_intersect(&p, Segment::new(0, 2), Segment::new(0, 2)));
    }

    #[test]
    fn collinear_touching_counts() {
        let p = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 0.0),
            Point::new(5.0, 0.0),
        ];
        // 2 lies in the interior of 0-1
        assert!(segments_intersect(&p, Segment::new(0, 1), Segment::new(2, 3)));
        // disjoint collinear pieces
        assert!(!segments_intersect(&p, Segment::new(0, 1), Segment::new(4, 5)));
    }

    #[test]
    fn regular_polygon_points() {
        let p = convex_polygon(4);
        assert_eq!(p.len(), 4);
        assert!((p[1] - Point::new(0.0, 1.0)).norm() < 1e-12);
        assert_eq!(Segment::new(3, 1).to_string(), "1-3");
    }
}
