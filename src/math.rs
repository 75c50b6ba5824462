//! Shared geometric helpers for the folding-cube model.
//!
//! Every tolerant comparison in the crate goes through the single
//! `COORD_TOLERANCE` constant, so repeated rotation matrices cannot drift a
//! coordinate past one equality test but not another.

use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

/// System-wide tolerance for coordinate comparisons.
pub(crate) const COORD_TOLERANCE: f32 = 1e-3;

/// Tolerant scalar equality.
pub(crate) fn nearly_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < COORD_TOLERANCE
}

/// Tolerant point equality on all three coordinates.
pub(crate) fn same_point(a: &Point3<f32>, b: &Point3<f32>) -> bool {
    (a.x - b.x).abs() <= COORD_TOLERANCE
        && (a.y - b.y).abs() <= COORD_TOLERANCE
        && (a.z - b.z).abs() <= COORD_TOLERANCE
}

/// Rigid rotation of `angle` radians about `axis` through `pivot`.
pub(crate) fn rotation_about(
    pivot: &Point3<f32>,
    axis: &Vector3<f32>,
    angle: f32,
) -> Matrix4<f32> {
    Matrix4::new_translation(&pivot.coords)
        * Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle).to_homogeneous()
        * Matrix4::new_translation(&-pivot.coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_shared_by_scalar_and_point_checks() {
        assert!(nearly_equal(1.0, 1.0 + COORD_TOLERANCE / 2.0));
        assert!(!nearly_equal(1.0, 1.0 + COORD_TOLERANCE * 2.0));

        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0005, 2.0, 3.0);
        let c = Point3::new(1.002, 2.0, 3.0);
        assert!(same_point(&a, &b));
        assert!(!same_point(&a, &c));
    }

    #[test]
    fn rotation_about_pivot_keeps_pivot_fixed() {
        let pivot = Point3::new(2.0, -1.0, 0.0);
        let m = rotation_about(&pivot, &Vector3::z(), std::f32::consts::FRAC_PI_2);
        let moved = m.transform_point(&pivot);
        assert!(same_point(&moved, &pivot));
    }

    #[test]
    fn quarter_turn_about_z_swings_a_point_up() {
        let pivot = Point3::new(0.0, -1.0, 0.0);
        let m = rotation_about(&pivot, &Vector3::z(), std::f32::consts::FRAC_PI_2);
        // (2, -1, 0) is two units right of the pivot; a counterclockwise
        // quarter turn puts it two units above.
        let moved = m.transform_point(&Point3::new(2.0, -1.0, 0.0));
        assert!(same_point(&moved, &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn half_step_rotation_is_45_degrees() {
        let pivot = Point3::new(0.0, 0.0, 0.0);
        let m = rotation_about(&pivot, &Vector3::z(), 45.0_f32.to_radians());
        let moved = m.transform_point(&Point3::new(2.0, 0.0, 0.0));
        let expected = 2.0 * 45.0_f32.to_radians().cos();
        assert!(nearly_equal(moved.x, expected));
        assert!(nearly_equal(moved.y, expected));
    }
}
