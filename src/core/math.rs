//! Angular arithmetic for 2D navigation.

use std::f32::consts::PI;

/// Normalize an angle to (-π, π].
///
/// # Example
/// ```
/// use marga_nav::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest signed angular difference from angle `a` to angle `b`, in (-π, π].
///
/// Returns the angle you need to add to `a` to reach `b`, taking the
/// shortest path around the circle.
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_zero() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_normalize_angle_boundary() {
        // Range is half-open: -π maps to +π.
        assert_relative_eq!(normalize_angle(PI), PI);
        assert_relative_eq!(normalize_angle(-PI), PI);
    }

    #[test]
    fn test_normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-2.0 * PI), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_angle_just_beyond_boundary() {
        let result = normalize_angle(PI + 0.001);
        assert!(result < 0.0, "should wrap to negative: {}", result);
        assert_relative_eq!(result, -PI + 0.001, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_diff_same_sign() {
        assert_relative_eq!(angle_diff(0.0, PI / 2.0), PI / 2.0);
        assert_relative_eq!(angle_diff(PI / 2.0, 0.0), -PI / 2.0);
    }

    #[test]
    fn test_angle_diff_crossing_pi() {
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-6);
        assert_relative_eq!(angle_diff(-PI + 0.1, PI - 0.1), -0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff_same_angle() {
        assert_relative_eq!(angle_diff(1.0, 1.0), 0.0, epsilon = 1e-6);
    }
}
