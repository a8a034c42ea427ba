//! Angle utilities used across the lane pipeline.
//!
//! All angles here are in degrees and measured in image coordinates
//! (`x` right, `y` down), so a positive direction turns `+x` towards `+y`.

/// Direction of the vector `a → b`, degrees in (−180, 180].
#[inline]
pub fn direction_deg(a: [f32; 2], b: [f32; 2]) -> f32 {
    normalize_deg((b[1] - a[1]).atan2(b[0] - a[0]).to_degrees())
}

/// Wraps an angle into (−180, 180].
#[inline]
pub fn normalize_deg(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a -= 360.0;
    }
    if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Smallest unsigned difference between two orientations, treating antipodal
/// directions as equivalent. Returns a value in [0, 90].
#[inline]
pub fn angular_difference_deg(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs().rem_euclid(180.0);
    if diff > 90.0 {
        180.0 - diff
    } else {
        diff
    }
}

/// Unsigned angle between two 2D vectors in degrees, in [0, 180].
/// Zero if they point the same way, 180 if opposite.
#[inline]
pub fn angle_between_deg(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = (a[0] * a[0] + a[1] * a[1]).sqrt().max(1e-6);
    let nb = (b[0] * b[0] + b[1] * b[1]).sqrt().max(1e-6);
    (dot / (na * nb)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Rotation that turns a curve with direction `theta_deg` onto the `+y` scan
/// axis, snapped to the nearest quarter turn when within `snap_tol_deg`.
///
/// The result lies in (−180, 180].
pub fn scan_rotation_deg(theta_deg: f32, snap_tol_deg: f32) -> f32 {
    let raw = normalize_deg(90.0 - theta_deg);
    for quarter in [0.0f32, 90.0, 180.0, -90.0] {
        let d = normalize_deg(raw - quarter).abs();
        if d <= snap_tol_deg {
            return quarter;
        }
    }
    raw
}

/// `true` when the orientation is closer to the image `x` axis than to `y`.
#[inline]
pub fn is_horizontal_deg(theta_deg: f32) -> bool {
    angular_difference_deg(theta_deg, 0.0) < 45.0
}

/// `true` when the orientation is closer to the image `y` axis than to `x`.
#[inline]
pub fn is_vertical_deg(theta_deg: f32) -> bool {
    angular_difference_deg(theta_deg, 90.0) < 45.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normalize_deg_wraps_into_half_open_range() {
        assert!(approx_eq(normalize_deg(190.0), -170.0));
        assert!(approx_eq(normalize_deg(-180.0), 180.0));
        assert!(approx_eq(normalize_deg(540.0), 180.0));
        assert!(approx_eq(normalize_deg(-45.0), -45.0));
    }

    #[test]
    fn angular_difference_handles_wrap() {
        assert!(approx_eq(angular_difference_deg(0.0, 180.0), 0.0));
        assert!(approx_eq(angular_difference_deg(10.0, 170.0), 20.0));
        assert!(approx_eq(angular_difference_deg(45.0, -45.0), 90.0));
    }

    #[test]
    fn angle_between_basic() {
        assert!(approx_eq(angle_between_deg(&[1.0, 0.0], &[1.0, 0.0]), 0.0));
        assert!(approx_eq(angle_between_deg(&[1.0, 0.0], &[-1.0, 0.0]), 180.0));
        assert!(approx_eq(angle_between_deg(&[1.0, 0.0], &[0.0, 1.0]), 90.0));
    }

    #[test]
    fn scan_rotation_snaps_quarter_turns() {
        // Already running down the image.
        assert!(approx_eq(scan_rotation_deg(90.0, 1.0), 0.0));
        // Running right: turn +x onto +y.
        assert!(approx_eq(scan_rotation_deg(0.0, 1.0), 90.0));
        assert!(approx_eq(scan_rotation_deg(0.6, 1.0), 90.0));
        // Running up.
        assert!(approx_eq(scan_rotation_deg(-90.0, 1.0), 180.0));
        // Running left.
        assert!(approx_eq(scan_rotation_deg(180.0, 1.0), -90.0));
    }

    #[test]
    fn scan_rotation_keeps_oblique_angles() {
        assert!(approx_eq(scan_rotation_deg(30.0, 1.0), 60.0));
        assert!(approx_eq(scan_rotation_deg(135.0, 1.0), -45.0));
    }

    #[test]
    fn orientation_flags_follow_dominant_axis() {
        assert!(is_horizontal_deg(10.0) && !is_vertical_deg(10.0));
        assert!(is_horizontal_deg(-175.0));
        assert!(is_vertical_deg(-80.0) && !is_horizontal_deg(-80.0));
    }
}
