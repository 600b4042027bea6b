use crate::prelude::Point;

pub struct GeometryHelper;

impl GeometryHelper {
    /// Sensor-frame polar return to Cartesian; `angle_deg` in degrees.
    #[inline]
    pub fn polar_to_cartesian(angle_deg: f64, distance: f64) -> Point {
        let theta = angle_deg.to_radians();
        Point::new(distance * theta.cos(), distance * theta.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn polar_to_cartesian_cardinal_bearings() {
        let p = GeometryHelper::polar_to_cartesian(0.0, 1000.0);
        assert!((p.x - 1000.0).abs() < TOL && p.y.abs() < TOL);

        let p = GeometryHelper::polar_to_cartesian(90.0, 1000.0);
        assert!(p.x.abs() < TOL && (p.y - 1000.0).abs() < TOL);

        let p = GeometryHelper::polar_to_cartesian(180.0, 500.0);
        assert!((p.x + 500.0).abs() < TOL && p.y.abs() < TOL);

        let p = GeometryHelper::polar_to_cartesian(270.0, 250.0);
        assert!(p.x.abs() < TOL && (p.y + 250.0).abs() < TOL);
    }

    #[test]
    fn polar_to_cartesian_preserves_range() {
        let p = GeometryHelper::polar_to_cartesian(37.5, 1234.0);
        assert!((p.x.hypot(p.y) - 1234.0).abs() < 1e-6);
    }
}
