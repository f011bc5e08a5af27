/// Triangle clipping against an arbitrary plane
use nalgebra::{Point3, Unit, Vector3};

use crate::geometry::Triangle;

/// A clip plane given by a point on the plane and its normal.
///
/// Points at a non-negative signed distance are "inside" and survive
/// clipping.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    point: Point3<f32>,
    normal: Unit<Vector3<f32>>,
}

impl Plane {
    /// The normal does not need to be pre-normalized.
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            point,
            normal: Unit::new_normalize(normal),
        }
    }

    /// Signed distance from `p` to the plane; non-negative = inside.
    pub fn signed_distance(&self, p: &Point3<f32>) -> f32 {
        self.normal.dot(&p.coords) - self.normal.dot(&self.point.coords)
    }

    /// Intersection of the segment `start`-`end` with the plane, via the
    /// parametric line-plane formula. Only meaningful when the endpoints
    /// lie on opposite sides of the plane.
    fn intersect_segment(&self, start: &Point3<f32>, end: &Point3<f32>) -> Point3<f32> {
        let d = -self.normal.dot(&self.point.coords);
        let ad = self.normal.dot(&start.coords);
        let bd = self.normal.dot(&end.coords);
        let t = (-d - ad) / (bd - ad);
        start + (end - start) * t
    }
}

/// Outcome of clipping one triangle against one plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipResult {
    /// Every vertex outside; the triangle is discarded.
    None,
    /// The inside portion is a single triangle (either the unchanged
    /// input, or a smaller triangle when two vertices were cut away).
    One(Triangle),
    /// One vertex was cut away, leaving a quad split into two triangles.
    Two(Triangle, Triangle),
}

impl ClipResult {
    pub fn count(&self) -> usize {
        match self {
            ClipResult::None => 0,
            ClipResult::One(_) => 1,
            ClipResult::Two(_, _) => 2,
        }
    }

    /// Append the surviving triangles to `out`.
    pub fn push_onto(self, out: &mut impl Extend<Triangle>) {
        match self {
            ClipResult::None => {}
            ClipResult::One(a) => out.extend([a]),
            ClipResult::Two(a, b) => out.extend([a, b]),
        }
    }
}

/// Clip a triangle against a plane, yielding the portion on the inside
/// half-space as 0, 1, or 2 triangles.
///
/// Vertices are classified by signed distance (non-negative = inside)
/// into index arrays, and the four possible (inside, outside) count
/// configurations are handled exhaustively. Output triangles inherit
/// the input triangle's shade.
pub fn clip_triangle(plane: &Plane, tri: &Triangle) -> ClipResult {
    let mut inside = [0usize; 3];
    let mut outside = [0usize; 3];
    let mut n_inside = 0;
    let mut n_outside = 0;

    for (i, p) in tri.p.iter().enumerate() {
        if plane.signed_distance(p) >= 0.0 {
            inside[n_inside] = i;
            n_inside += 1;
        } else {
            outside[n_outside] = i;
            n_outside += 1;
        }
    }

    match (n_inside, n_outside) {
        (0, 3) => ClipResult::None,
        (3, 0) => ClipResult::One(*tri),
        (1, 2) => {
            // The surviving vertex plus the two points where the edges
            // toward the cut vertices cross the plane.
            let keep = tri.p[inside[0]];
            ClipResult::One(Triangle::with_shade(
                [
                    keep,
                    plane.intersect_segment(&keep, &tri.p[outside[0]]),
                    plane.intersect_segment(&keep, &tri.p[outside[1]]),
                ],
                tri.shade,
            ))
        }
        (2, 1) => {
            // Two survivors form a quad with the two edge crossings;
            // split it into two triangles sharing the first crossing.
            let keep0 = tri.p[inside[0]];
            let keep1 = tri.p[inside[1]];
            let cut = tri.p[outside[0]];
            let cross0 = plane.intersect_segment(&keep0, &cut);
            let cross1 = plane.intersect_segment(&keep1, &cut);
            ClipResult::Two(
                Triangle::with_shade([keep0, keep1, cross0], tri.shade),
                Triangle::with_shade([keep1, cross0, cross1], tri.shade),
            )
        }
        // Three vertices always classify into exactly one of the four
        // configurations above.
        _ => unreachable!("triangle vertex classification out of range"),
    }
}
