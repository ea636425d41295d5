//! Qibla bearing and compass needle helpers.

pub const KAABA_LAT: f64 = 21.4225;
pub const KAABA_LNG: f64 = 39.8262;

/// Initial great-circle bearing from (`lat`, `lng`) to the Kaaba, in degrees
/// clockwise from true north, in `[0, 360)`.
pub fn qibla_bearing(lat: f64, lng: f64) -> f64 {
    let lat_r = lat.to_radians();
    let k_lat_r = KAABA_LAT.to_radians();
    let d_lng = KAABA_LNG.to_radians() - lng.to_radians();

    let x = d_lng.sin();
    let y = lat_r.cos() * k_lat_r.tan() - lat_r.sin() * d_lng.cos();
    normalize_degrees(x.atan2(y).to_degrees())
}

pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Signed rotation in `[-180, 180)` that turns `from` onto `to`.
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    (to - from + 540.0).rem_euclid(360.0) - 180.0
}

/// Compass needle that always turns the short way round.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Needle {
    rotation: f64,
}

impl Needle {
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotates towards `target` and returns the signed turn applied.
    pub fn point_to(&mut self, target: f64) -> f64 {
        let delta = shortest_angle_delta(self.rotation, normalize_degrees(target));
        self.rotation = normalize_degrees(self.rotation + delta);
        delta
    }

    /// Needle angle relative to the device for a given compass heading.
    pub fn relative_to_heading(bearing: f64, heading: f64) -> f64 {
        normalize_degrees(bearing - heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_bearing_from_kabul() {
        // Kabul faces roughly west-southwest
        let bearing = qibla_bearing(34.5553, 69.2075);
        assert!(close(bearing, 250.77, 0.5), "got {}", bearing);
    }

    #[test]
    fn test_bearing_from_london() {
        let bearing = qibla_bearing(51.5074, -0.1278);
        assert!(close(bearing, 118.99, 1.0), "got {}", bearing);
    }

    #[test]
    fn test_bearing_due_south_on_same_meridian() {
        let bearing = qibla_bearing(40.0, KAABA_LNG);
        assert!(close(bearing, 180.0, 1e-6), "got {}", bearing);
    }

    #[test]
    fn test_bearing_range() {
        for lat in [-60.0, -10.0, 0.0, 30.0, 70.0] {
            for lng in [-170.0, -45.0, 0.0, 90.0, 179.0] {
                let bearing = qibla_bearing(lat, lng);
                assert!((0.0..360.0).contains(&bearing));
            }
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }

    #[test]
    fn test_shortest_delta_wraps() {
        assert_eq!(shortest_angle_delta(350.0, 10.0), 20.0);
        assert_eq!(shortest_angle_delta(10.0, 350.0), -20.0);
        assert_eq!(shortest_angle_delta(0.0, 180.0), -180.0);
    }

    #[test]
    fn test_needle_turns_short_way() {
        let mut needle = Needle::default();
        needle.point_to(350.0);
        assert_eq!(needle.rotation(), 350.0);

        let turn = needle.point_to(20.0);
        assert_eq!(turn, 30.0);
        assert_eq!(needle.rotation(), 20.0);
    }

    #[test]
    fn test_relative_to_heading() {
        assert_eq!(Needle::relative_to_heading(120.0, 90.0), 30.0);
        assert_eq!(Needle::relative_to_heading(10.0, 90.0), 280.0);
    }
}
