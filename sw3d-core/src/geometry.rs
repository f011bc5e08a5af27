/// Geometry primitives for the software rasterization pipeline
use nalgebra::{Point3, Vector3};

/// Character ramp for quantized Lambertian shading (darkest to lightest)
pub const SHADE_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '@'];

/// Display attributes assigned to a triangle during the lighting stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shade {
    pub glyph: char,
    pub level: u8,
}

impl Shade {
    /// Quantize a Lambertian intensity in `[0, 1]` onto the shade ramp.
    pub fn from_intensity(intensity: f32) -> Self {
        let last = SHADE_RAMP.len() - 1;
        let level = (intensity.clamp(0.0, 1.0) * last as f32) as usize;
        let level = level.min(last);
        Self {
            glyph: SHADE_RAMP[level],
            level: level as u8,
        }
    }
}

impl Default for Shade {
    fn default() -> Self {
        Self::from_intensity(1.0)
    }
}

/// A triangle carried by value through every pipeline stage.
///
/// The three positions are interpreted in whatever coordinate space the
/// current stage expects (world, view, or screen); the type itself does
/// not track the space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p: [Point3<f32>; 3],
    pub shade: Shade,
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self {
            p: [p0, p1, p2],
            shade: Shade::default(),
        }
    }

    pub fn with_shade(p: [Point3<f32>; 3], shade: Shade) -> Self {
        Self { p, shade }
    }

    /// Face normal: normalized cross product of the two edges leaving `p[0]`.
    ///
    /// A zero-area triangle yields NaN components; guarding against
    /// degenerate input is the caller's responsibility.
    pub fn normal(&self) -> Vector3<f32> {
        let edge1 = self.p[1] - self.p[0];
        let edge2 = self.p[2] - self.p[0];
        edge1.cross(&edge2).normalize()
    }

    /// Average z of the three vertices, the painter's-algorithm sort key.
    pub fn mean_z(&self) -> f32 {
        (self.p[0].z + self.p[1].z + self.p[2].z) / 3.0
    }
}

/// A 3D mesh composed of triangles, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Axis-aligned cube centered at the origin with outward-facing
    /// winding, used by demos and tests.
    pub fn cube(size: f32) -> Self {
        let a = -size / 2.0;
        let b = size / 2.0;
        let v = |x, y, z| Point3::new(x, y, z);
        let mut mesh = Self::with_capacity(12);

        // Front (z = a)
        mesh.add_triangle(Triangle::new(v(a, a, a), v(a, b, a), v(b, b, a)));
        mesh.add_triangle(Triangle::new(v(a, a, a), v(b, b, a), v(b, a, a)));
        // Right (x = b)
        mesh.add_triangle(Triangle::new(v(b, a, a), v(b, b, a), v(b, b, b)));
        mesh.add_triangle(Triangle::new(v(b, a, a), v(b, b, b), v(b, a, b)));
        // Back (z = b)
        mesh.add_triangle(Triangle::new(v(b, a, b), v(b, b, b), v(a, b, b)));
        mesh.add_triangle(Triangle::new(v(b, a, b), v(a, b, b), v(a, a, b)));
        // Left (x = a)
        mesh.add_triangle(Triangle::new(v(a, a, b), v(a, b, b), v(a, b, a)));
        mesh.add_triangle(Triangle::new(v(a, a, b), v(a, b, a), v(a, a, a)));
        // Top (y = b)
        mesh.add_triangle(Triangle::new(v(a, b, a), v(a, b, b), v(b, b, b)));
        mesh.add_triangle(Triangle::new(v(a, b, a), v(b, b, b), v(b, b, a)));
        // Bottom (y = a)
        mesh.add_triangle(Triangle::new(v(b, a, b), v(a, a, b), v(a, a, a)));
        mesh.add_triangle(Triangle::new(v(b, a, b), v(a, a, a), v(b, a, a)));

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_twelve_triangles() {
        let mesh = Mesh::cube(1.0);
        assert_eq!(mesh.triangles.len(), 12);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = Mesh::cube(2.0);
        for tri in &mesh.triangles {
            let normal = tri.normal();
            let centroid = (tri.p[0].coords + tri.p[1].coords + tri.p[2].coords) / 3.0;
            // For a cube centered at the origin, each face normal points
            // away from the center.
            assert!(normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_face_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let normal = tri.normal();
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_mean_z() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 6.0),
        );
        assert!((tri.mean_z() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_shade_quantization_bounds() {
        assert_eq!(Shade::from_intensity(-0.5).level, 0);
        assert_eq!(
            Shade::from_intensity(1.0).level as usize,
            SHADE_RAMP.len() - 1
        );
        assert_eq!(Shade::from_intensity(2.0).glyph, '@');
    }
}
