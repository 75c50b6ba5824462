//! Orthographic view of the cube scene.
//!
//! The camera is fixed at (0, 0, 20) looking at the origin. The projection
//! is orthographic, with half-extents chosen so a 45 degree field of view
//! at that distance fills the viewport vertically; picking shares the same
//! scale so clicks and pixels agree. While the folded cube is on display
//! the model matrix tilts it so three faces are visible.

use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

const CAMERA_DISTANCE: f32 = 20.0;
const FOVY_DEGREES: f32 = 45.0;
const ZNEAR: f32 = 0.1;
const ZFAR: f32 = 100.0;
/// Tilt shown while the folded cube idles.
const DISPLAY_TILT_DEGREES: f32 = -45.0;

/// Vertical world half-extent of the view volume.
pub(crate) fn half_height() -> f32 {
    (FOVY_DEGREES.to_radians() / 2.0).tan() * CAMERA_DISTANCE
}

/// Scale mapping model units into the normalized vertical view range.
pub(crate) fn world_scale() -> f32 {
    1.0 / half_height()
}

/// Orthographic projection-view for the given aspect ratio.
pub(crate) fn proj_view(aspect: f32) -> Matrix4<f32> {
    let view = Matrix4::look_at_rh(
        &Point3::new(0.0, 0.0, CAMERA_DISTANCE),
        &Point3::origin(),
        &Vector3::y(),
    );
    let hh = half_height();
    let hw = hh * aspect;
    Matrix4::new_orthographic(-hw, hw, -hh, hh, ZNEAR, ZFAR) * view
}

/// Model transform: tilted while the folded cube is on display, identity
/// for the flat net.
pub(crate) fn model(display_tilt: bool) -> Matrix4<f32> {
    if display_tilt {
        Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(-1.0, 1.0, 0.0)),
            DISPLAY_TILT_DEGREES.to_radians(),
        )
        .to_homogeneous()
    } else {
        Matrix4::identity()
    }
}

/// Uniform block shared by both render pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ViewUniform {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) proj_view: [[f32; 4]; 4],
}

impl ViewUniform {
    pub(crate) fn new(aspect: f32, display_tilt: bool) -> Self {
        Self {
            model: model(display_tilt).into(),
            proj_view: proj_view(aspect).into(),
        }
    }
}
