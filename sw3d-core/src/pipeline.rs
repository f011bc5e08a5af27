/// The per-frame geometry pipeline
///
/// World transform, backface cull, Lambertian shading, view transform,
/// near-plane clip, projection + perspective divide, screen mapping,
/// painter's depth sort, four-edge screen clip, and emission to the
/// presentation sink.
use std::cmp::Ordering;
use std::collections::VecDeque;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::camera::Camera;
use crate::clip::{clip_triangle, ClipResult, Plane};
use crate::geometry::{Mesh, Shade, Triangle};
use crate::transform;

/// Presentation-sink boundary. The pipeline calls this once per final
/// triangle, back to front, with screen-space pixel coordinates in
/// x/y (z still carries post-divide depth). The sink owns all pixel
/// writes and screen clearing.
pub trait RasterSink {
    fn draw_triangle(&mut self, tri: &Triangle);
}

/// Per-frame counters, reported by [`Pipeline::render`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles in the source mesh
    pub mesh_triangles: usize,
    /// Triangles discarded as facing away from the camera
    pub backface_culled: usize,
    /// Triangles trimmed or dropped by the near-plane clip
    pub near_clipped: usize,
    /// Triangles handed to the sink after the screen-edge clip
    pub drawn: usize,
}

/// Stateless frame renderer for a fixed viewport and projection.
///
/// All per-frame inputs (mesh, world matrix, camera) are arguments to
/// [`render`](Self::render); a frame's output depends on nothing else.
pub struct Pipeline {
    width: f32,
    height: f32,
    near: f32,
    projection: Matrix4<f32>,
    light_dir: Vector3<f32>,
}

impl Pipeline {
    /// Pipeline with a 90 degree FOV and a 0.1..1000 depth range.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_options(width, height, 90.0, 0.1, 1000.0)
    }

    pub fn with_options(width: u32, height: u32, fov_deg: f32, near: f32, far: f32) -> Self {
        let aspect = height as f32 / width as f32;
        Self {
            width: width as f32,
            height: height as f32,
            near,
            projection: transform::perspective(fov_deg, aspect, near, far),
            light_dir: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Replace the directional light. The direction is normalized here;
    /// a zero vector is a caller error.
    pub fn set_light(&mut self, dir: Vector3<f32>) {
        self.light_dir = dir.normalize();
    }

    /// Run the full pipeline for one frame, emitting visible triangles
    /// to `sink` in back-to-front order.
    pub fn render<S: RasterSink + ?Sized>(
        &self,
        mesh: &Mesh,
        world: &Matrix4<f32>,
        camera: &Camera,
        sink: &mut S,
    ) -> FrameStats {
        let view = camera.view_matrix();
        let near_plane = Plane::new(Point3::new(0.0, 0.0, self.near), Vector3::z());

        let mut stats = FrameStats {
            mesh_triangles: mesh.triangles.len(),
            ..FrameStats::default()
        };
        let mut render_list: Vec<Triangle> = Vec::with_capacity(mesh.triangles.len());

        for tri in &mesh.triangles {
            let world_tri = apply_affine(world, tri);

            // Cull triangles facing away from the camera. A degenerate
            // (NaN-normal) triangle fails the keep test and falls out
            // here as well.
            let normal = world_tri.normal();
            if !(normal.dot(&(world_tri.p[0] - camera.position)) < 0.0) {
                stats.backface_culled += 1;
                continue;
            }

            let shade = Shade::from_intensity(normal.dot(&self.light_dir).max(0.0));

            let mut view_tri = apply_affine(&view, &world_tri);
            view_tri.shade = shade;

            // Clip against the near plane in view space; each surviving
            // piece is projected and screen-mapped independently.
            let clipped = clip_triangle(&near_plane, &view_tri);
            if !matches!(clipped, ClipResult::One(t) if t == view_tri) {
                stats.near_clipped += 1;
            }

            let mut pieces: Vec<Triangle> = Vec::with_capacity(2);
            clipped.push_onto(&mut pieces);
            for piece in pieces {
                render_list.push(self.to_screen(&piece));
            }
        }

        // Painter's algorithm: farthest triangles first, so nearer ones
        // overwrite them. NaN depth keys sort arbitrarily.
        render_list.sort_by(painter_cmp);

        for tri in render_list {
            for piece in self.clip_to_viewport(tri) {
                sink.draw_triangle(&piece);
                stats.drawn += 1;
            }
        }

        log::trace!(
            "frame: {} mesh triangles, {} culled, {} near-clipped, {} drawn",
            stats.mesh_triangles,
            stats.backface_culled,
            stats.near_clipped,
            stats.drawn
        );
        stats
    }

    /// Project a view-space triangle and map it into pixel coordinates.
    ///
    /// The perspective divide happens here, explicitly, after the
    /// projection matrix and before the screen mapping; z keeps the
    /// post-divide depth for the painter sort.
    fn to_screen(&self, tri: &Triangle) -> Triangle {
        let mut out = *tri;
        for p in &mut out.p {
            let h = transform::transform_point(&self.projection, p);
            let ndc = transform::perspective_divide(&h);
            // Invert both axes, shift NDC into [0, 2], scale to pixels.
            *p = Point3::new(
                (-ndc.x + 1.0) * 0.5 * self.width,
                (-ndc.y + 1.0) * 0.5 * self.height,
                ndc.z,
            );
        }
        out
    }

    /// Clip a screen-space triangle against the four viewport edges.
    ///
    /// Edges are processed in a fixed order (top, bottom, left, right);
    /// for each edge the current worklist is drained and every clip
    /// output re-queued for the next edge.
    pub fn clip_to_viewport(&self, tri: Triangle) -> Vec<Triangle> {
        let max_x = self.width - 1.0;
        let max_y = self.height - 1.0;
        let edges = [
            Plane::new(Point3::origin(), Vector3::y()),
            Plane::new(Point3::new(0.0, max_y, 0.0), -Vector3::y()),
            Plane::new(Point3::origin(), Vector3::x()),
            Plane::new(Point3::new(max_x, 0.0, 0.0), -Vector3::x()),
        ];

        let mut queue: VecDeque<Triangle> = VecDeque::with_capacity(4);
        queue.push_back(tri);
        for edge in &edges {
            for _ in 0..queue.len() {
                let Some(t) = queue.pop_front() else { break };
                clip_triangle(edge, &t).push_onto(&mut queue);
            }
        }
        queue.into_iter().collect()
    }
}

/// Descending mean-z comparison for the painter sort
fn painter_cmp(a: &Triangle, b: &Triangle) -> Ordering {
    b.mean_z()
        .partial_cmp(&a.mean_z())
        .unwrap_or(Ordering::Equal)
}

/// Transform all three vertices by an affine (rotation/translation)
/// matrix. The homogeneous w stays 1, so no divide is involved.
fn apply_affine(m: &Matrix4<f32>, tri: &Triangle) -> Triangle {
    let mut out = *tri;
    for p in &mut out.p {
        let h = transform::transform_point(m, p);
        *p = Point3::new(h.x, h.y, h.z);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test sink that records every emitted triangle in order
    #[derive(Default)]
    struct CollectSink {
        tris: Vec<Triangle>,
    }

    impl RasterSink for CollectSink {
        fn draw_triangle(&mut self, tri: &Triangle) {
            self.tris.push(*tri);
        }
    }

    /// Screen-space-facing triangle at depth z: normal points toward -z.
    fn facing_tri(x: f32, y: f32, z: f32, size: f32) -> Triangle {
        Triangle::new(
            Point3::new(x, y, z),
            Point3::new(x, y + size, z),
            Point3::new(x + size, y, z),
        )
    }

    #[test]
    fn test_cube_front_face_passes_cull_and_stays_on_screen() {
        let pipeline = Pipeline::new(200, 200);
        let mesh = Mesh::cube(1.0);
        let camera = Camera::new(Point3::new(0.0, 0.0, -5.0));
        let mut sink = CollectSink::default();

        let stats = pipeline.render(&mesh, &Matrix4::identity(), &camera, &mut sink);

        // Only the face turned toward the camera survives the cull; the
        // four side faces are exactly edge-on and count as facing away.
        assert_eq!(stats.mesh_triangles, 12);
        assert_eq!(stats.backface_culled, 10);
        assert_eq!(stats.near_clipped, 0);
        assert_eq!(stats.drawn, 2);
        assert_eq!(sink.tris.len(), 2);

        // At 90 degrees FOV the whole face lands inside the viewport.
        for tri in &sink.tris {
            for p in &tri.p {
                assert!(p.x >= 0.0 && p.x <= 199.0, "x out of bounds: {}", p.x);
                assert!(p.y >= 0.0 && p.y <= 199.0, "y out of bounds: {}", p.y);
            }
            // The face normal points straight at the default light.
            assert_eq!(tri.shade, Shade::from_intensity(1.0));
        }
    }

    #[test]
    fn test_near_plane_straddle_emits_single_trimmed_triangle() {
        let pipeline = Pipeline::new(200, 200);
        let mut mesh = Mesh::new();
        // One vertex well in front of the camera, two behind the near
        // plane; wound so the face points back toward the camera.
        mesh.add_triangle(Triangle::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.2, -1.0),
            Point3::new(0.2, 0.0, -1.0),
        ));
        let camera = Camera::default();
        let mut sink = CollectSink::default();

        let stats = pipeline.render(&mesh, &Matrix4::identity(), &camera, &mut sink);

        assert_eq!(stats.backface_culled, 0);
        assert_eq!(stats.near_clipped, 1);
        assert_eq!(stats.drawn, 1);
    }

    #[test]
    fn test_offscreen_triangle_produces_no_drawables() {
        let pipeline = Pipeline::new(200, 200);
        let mut mesh = Mesh::new();
        // Far off to the side: projects outside the viewport entirely.
        mesh.add_triangle(Triangle::new(
            Point3::new(100.0, 0.0, 5.0),
            Point3::new(100.0, 1.0, 5.0),
            Point3::new(101.0, 0.0, 5.0),
        ));
        let camera = Camera::default();
        let mut sink = CollectSink::default();

        let stats = pipeline.render(&mesh, &Matrix4::identity(), &camera, &mut sink);

        assert_eq!(stats.backface_culled, 0);
        assert_eq!(stats.drawn, 0);
        assert!(sink.tris.is_empty());
    }

    #[test]
    fn test_triangles_emitted_back_to_front() {
        let pipeline = Pipeline::new(200, 200);
        let mut mesh = Mesh::new();
        mesh.add_triangle(facing_tri(-0.4, 0.0, 2.0, 0.2)); // near
        mesh.add_triangle(facing_tri(0.2, 0.0, 5.0, 0.2)); // far
        let camera = Camera::default();
        let mut sink = CollectSink::default();

        let stats = pipeline.render(&mesh, &Matrix4::identity(), &camera, &mut sink);

        assert_eq!(stats.drawn, 2);
        // Post-divide depth is monotonic in view depth, so the far
        // triangle must come out first.
        assert!(sink.tris[0].mean_z() > sink.tris[1].mean_z());
    }

    #[test]
    fn test_painter_sort_direction_is_order_independent() {
        let tris: Vec<Triangle> = [4.0, 1.0, 3.0, 2.0, 5.0]
            .iter()
            .map(|&z| facing_tri(0.0, 0.0, z, 1.0))
            .collect();

        let mut descending = tris.clone();
        descending.sort_by(painter_cmp);

        let mut ascending = tris;
        ascending.sort_by(|a, b| painter_cmp(b, a));
        ascending.reverse();

        assert_eq!(descending, ascending);
    }

    #[test]
    fn test_viewport_clip_keeps_interior_triangle_whole() {
        let pipeline = Pipeline::new(100, 100);
        let tri = facing_tri(10.0, 10.0, 0.5, 20.0);
        let out = pipeline.clip_to_viewport(tri);
        assert_eq!(out, vec![tri]);
    }

    #[test]
    fn test_viewport_clip_discards_fully_offscreen_triangle() {
        let pipeline = Pipeline::new(100, 100);
        let tri = facing_tri(-50.0, -50.0, 0.5, 10.0);
        assert!(pipeline.clip_to_viewport(tri).is_empty());
    }

    #[test]
    fn test_viewport_clip_trims_straddling_triangle_to_bounds() {
        let pipeline = Pipeline::new(100, 100);
        // Overlaps the top-left corner: clipped against two edges.
        let tri = facing_tri(-10.0, -10.0, 0.5, 40.0);
        let out = pipeline.clip_to_viewport(tri);
        assert!(!out.is_empty());
        for t in &out {
            for p in &t.p {
                assert!(p.x >= -1e-4 && p.x <= 99.0 + 1e-4);
                assert!(p.y >= -1e-4 && p.y <= 99.0 + 1e-4);
            }
        }
    }
}
