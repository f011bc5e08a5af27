/// SW3D Core Library - GPU-free 3D rendering pipeline
///
/// An embeddable software renderer: meshes are transformed through
/// world, view, and projection space, backface-culled, clipped against
/// the near plane and the viewport edges, depth-ordered with the
/// painter's algorithm, and emitted as shaded screen-space triangles to
/// a host-provided sink.

pub mod camera;
pub mod clip;
pub mod geometry;
pub mod obj;
pub mod pipeline;
pub mod transform;

// Re-export commonly used types
pub use camera::Camera;
pub use clip::{clip_triangle, ClipResult, Plane};
pub use geometry::{Mesh, Shade, Triangle, SHADE_RAMP};
pub use obj::{load_obj, parse_obj, MeshError};
pub use pipeline::{FrameStats, Pipeline, RasterSink};
