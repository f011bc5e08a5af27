/// Matrix builders and homogeneous-coordinate helpers
///
/// Conventions, applied uniformly across the crate:
/// - Column vectors: transforming a point is `m * p`, and the
///   composition `a * b` applies `b` first.
/// - Matrices default to all zeros; identity is built explicitly with
///   `Matrix4::identity()`.
/// - Rotation builders take the full angle on every axis.
/// - `transform_point` never divides by w; the perspective divide is a
///   separate, explicit step applied once after projection.
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3, Vector4};

/// Rotation about the X axis (radians)
pub fn rotation_x(theta: f32) -> Matrix4<f32> {
    Matrix4::new_rotation(Vector3::new(theta, 0.0, 0.0))
}

/// Rotation about the Y axis (radians)
pub fn rotation_y(theta: f32) -> Matrix4<f32> {
    Matrix4::new_rotation(Vector3::new(0.0, theta, 0.0))
}

/// Rotation about the Z axis (radians)
pub fn rotation_z(theta: f32) -> Matrix4<f32> {
    Matrix4::new_rotation(Vector3::new(0.0, 0.0, theta))
}

/// Rotation about an arbitrary axis (radians). The axis is normalized
/// internally; a zero axis is a caller error and yields NaN.
pub fn rotation_axis(axis: Vector3<f32>, theta: f32) -> Matrix4<f32> {
    Rotation3::from_axis_angle(&Unit::new_normalize(axis), theta).to_homogeneous()
}

/// Translation matrix
pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Perspective projection matrix for a left-handed view space looking
/// down +z.
///
/// `fov_deg` is the vertical field of view in degrees and `aspect` is
/// `height / width`. View-space z in `[near, far]` maps to
/// `[0, far/(far-near)]` before the divide, with w carrying the
/// view-space depth.
pub fn perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let f = 1.0 / (fov_deg.to_radians() * 0.5).tan();
    let q = far / (far - near);
    Matrix4::new(
        aspect * f, 0.0, 0.0, 0.0, //
        0.0, f, 0.0, 0.0, //
        0.0, 0.0, q, -near * q, //
        0.0, 0.0, 1.0, 0.0,
    )
}

/// Orientation matrix for a viewer at `eye` facing `target`.
///
/// Builds an orthonormal right/up/forward basis (Gram-Schmidt of `up`
/// against the new forward) and composes it with the eye translation.
/// The result maps camera space into world space; invert it with
/// [`quick_inverse`] to obtain the view matrix.
pub fn point_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
    let forward = (target - eye).normalize();
    let up = (up - forward * up.dot(&forward)).normalize();
    let right = up.cross(&forward);

    Matrix4::new(
        right.x, up.x, forward.x, eye.x, //
        right.y, up.y, forward.y, eye.y, //
        right.z, up.z, forward.z, eye.z, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Fast inverse for rotation + translation matrices.
///
/// Transposes the 3x3 rotation block and recomputes the translation as
/// `-R^T t`. Only valid for matrices composed purely of rotation and
/// translation (such as the camera matrix from [`point_at`]); applying
/// it to anything containing projection or non-uniform scale silently
/// produces a wrong result.
pub fn quick_inverse(m: &Matrix4<f32>) -> Matrix4<f32> {
    let rt = m.fixed_view::<3, 3>(0, 0).transpose();
    let t = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let t = -(rt * t);

    Matrix4::new(
        rt[(0, 0)], rt[(0, 1)], rt[(0, 2)], t.x, //
        rt[(1, 0)], rt[(1, 1)], rt[(1, 2)], t.y, //
        rt[(2, 0)], rt[(2, 1)], rt[(2, 2)], t.z, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Homogeneous transform of a point with implicit w = 1.
///
/// Returns the raw 4-component result; no perspective divide happens
/// here.
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Vector4<f32> {
    m * p.to_homogeneous()
}

/// Explicit perspective divide.
///
/// Divides x, y, z by w when w is nonzero; a w of exactly zero passes
/// the pre-divide components through unchanged.
pub fn perspective_divide(h: &Vector4<f32>) -> Point3<f32> {
    if h.w != 0.0 {
        Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
    } else {
        Point3::new(h.x, h.y, h.z)
    }
}
