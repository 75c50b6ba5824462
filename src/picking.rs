//! Mouse picking against the flat net.
//!
//! The view is orthographic, so a pixel maps straight onto the view plane:
//! normalize against the viewport half-extents, stretch X by the aspect
//! ratio, then test the mapped point against each face's bounding quad.

use nalgebra::Point3;

use crate::cube::{FACE_COUNT, VERTS_PER_FACE};

/// Maps a viewport position to the face under it, if any.
///
/// `world_scale` converts model units into the normalized vertical view
/// range, so clicks agree with what was rendered. Faces are tested in index
/// order; quads never overlap in a valid net, so the first hit wins.
pub(crate) fn face_at(
    vertices: &[Point3<f32>],
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    world_scale: f32,
) -> Option<usize> {
    let half_width = width / 2.0;
    let half_height = height / 2.0;
    let aspect = half_width / half_height;
    let wx = (x - half_width) / half_width * aspect;
    let wy = (half_height - y) / half_height;

    for face in 0..FACE_COUNT {
        let base = face * VERTS_PER_FACE;
        let mut quad = [
            vertices[base] * world_scale,
            vertices[base + 1] * world_scale,
            vertices[base + 2] * world_scale,
            vertices[base + 3] * world_scale,
        ];
        quad.sort_unstable_by(|a, b| a.x.total_cmp(&b.x));

        let inside_x = wx >= quad[0].x && wx < quad[3].x;
        let inside_y = (wy >= quad[0].y && wy < quad[1].y)
            || (wy >= quad[1].y && wy < quad[0].y);
        if inside_x && inside_y {
            log::debug!("click lands in face {face}");
            return Some(face);
        }
    }

    log::debug!("click lands in no face");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera;
    use crate::cube::NET_VERTICES;

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    fn pick(x: f32, y: f32) -> Option<usize> {
        face_at(&NET_VERTICES, x, y, WIDTH, HEIGHT, camera::world_scale())
    }

    /// Pixel coordinates of a world-space point under the test viewport.
    fn to_pixels(wx: f32, wy: f32) -> (f32, f32) {
        let s = camera::world_scale();
        let aspect = WIDTH / HEIGHT;
        (
            (wx * s / aspect) * (WIDTH / 2.0) + WIDTH / 2.0,
            HEIGHT / 2.0 - (wy * s) * (HEIGHT / 2.0),
        )
    }

    #[test]
    fn viewport_center_hits_face_three() {
        // World origin is the bottom-left corner of face 3.
        assert_eq!(pick(WIDTH / 2.0, HEIGHT / 2.0), Some(3));
    }

    #[test]
    fn each_face_center_picks_itself() {
        let centers = [
            (-3.0, 0.0, 0),
            (-1.0, -2.0, 1),
            (-1.0, 0.0, 2),
            (1.0, 0.0, 3),
            (1.0, 2.0, 4),
            (3.0, 0.0, 5),
        ];
        for (wx, wy, face) in centers {
            let (px, py) = to_pixels(wx, wy);
            assert_eq!(pick(px, py), Some(face), "face {face}");
        }
    }

    #[test]
    fn empty_corners_pick_nothing() {
        let (px, py) = to_pixels(-3.0, 2.0);
        assert_eq!(pick(px, py), None);
        assert_eq!(pick(1.0, 1.0), None);
    }
}
