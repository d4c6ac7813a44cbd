use std::fmt::Write;

/// A longitude/latitude pair, in that order (the directions provider's
/// coordinate convention).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Derive a stable cache key from an ordered waypoint sequence.
///
/// Each coordinate is fixed to 4 decimal places (~11 m), so nearby pin
/// drops collapse onto the same key — a deliberate precision/hit-rate
/// tradeoff. Order is preserved: pickup first, stops in visit order,
/// final drop-off last. Non-finite coordinates still format into a key;
/// it just never hits.
pub fn route_key(waypoints: &[GeoPoint]) -> String {
    let mut key = String::with_capacity(waypoints.len() * 20);
    for (i, wp) in waypoints.iter().enumerate() {
        if i > 0 {
            key.push('|');
        }
        let _ = write!(key, "{:.4},{:.4}", wp.lon, wp.lat);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let wps = [GeoPoint::new(-3.70379, 40.41678), GeoPoint::new(-3.69196, 40.42028)];
        assert_eq!(route_key(&wps), route_key(&wps));
    }

    #[test]
    fn rounds_to_four_decimals() {
        // Both round to -3.7038 / 40.4168.
        let a = [GeoPoint::new(-3.70379, 40.41678), GeoPoint::new(-3.6, 40.4)];
        let b = [GeoPoint::new(-3.70381, 40.41682), GeoPoint::new(-3.6, 40.4)];
        assert_eq!(route_key(&a), route_key(&b));

        // A shift past the 4th decimal produces a distinct key.
        let c = [GeoPoint::new(-3.7042, 40.41678), GeoPoint::new(-3.6, 40.4)];
        assert_ne!(route_key(&a), route_key(&c));
    }

    #[test]
    fn preserves_waypoint_order() {
        let forward = [GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)];
        let reverse = [GeoPoint::new(3.0, 4.0), GeoPoint::new(1.0, 2.0)];
        assert_ne!(route_key(&forward), route_key(&reverse));
    }

    #[test]
    fn separator_shape() {
        let wps = [GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)];
        assert_eq!(route_key(&wps), "1.0000,2.0000|3.0000,4.0000");
    }

    #[test]
    fn non_finite_does_not_panic() {
        let wps = [GeoPoint::new(f64::NAN, 2.0), GeoPoint::new(3.0, f64::INFINITY)];
        // Degenerate key, not a crash.
        assert!(!route_key(&wps).is_empty());
    }
}
