use item::Coordinates;

/// Mean Earth radius used by the haversine computation, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Why the gate passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoReason {
    /// Both positions known and within the cutoff.
    WithinRange,
    /// Both positions known and farther apart than the cutoff.
    TooFar,
    /// At least one position unknown; no constraint can be applied.
    Unconstrained,
}

/// Outcome of the distance gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoDecision {
    pub passed: bool,
    /// Computed distance, absent when either coordinate was missing.
    pub distance_km: Option<f64>,
    pub reason: GeoReason,
}

/// Great-circle distance between two positions in kilometers.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Gate a pair by physical distance.
///
/// When either position is unknown the gate passes unconditionally, since
/// there is nothing to constrain on. Otherwise the pair passes iff the
/// haversine distance does not exceed `max_distance_km`.
pub fn geo_gate(
    a: Option<Coordinates>,
    b: Option<Coordinates>,
    max_distance_km: f64,
) -> GeoDecision {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return GeoDecision {
                passed: true,
                distance_km: None,
                reason: GeoReason::Unconstrained,
            }
        }
    };

    let distance_km = haversine_km(a, b);
    if distance_km > max_distance_km {
        GeoDecision {
            passed: false,
            distance_km: Some(distance_km),
            reason: GeoReason::TooFar,
        }
    } else {
        GeoDecision {
            passed: true,
            distance_km: Some(distance_km),
            reason: GeoReason::WithinRange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANGALORE: Coordinates = Coordinates {
        lat: 12.9716,
        lng: 77.5946,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(BANGALORE, BANGALORE), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let north = Coordinates {
            lat: BANGALORE.lat + 1.0,
            lng: BANGALORE.lng,
        };
        let d = haversine_km(BANGALORE, north);
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn gate_passes_when_either_coordinate_is_absent() {
        let d = geo_gate(None, Some(BANGALORE), 2.0);
        assert!(d.passed);
        assert_eq!(d.reason, GeoReason::Unconstrained);
        assert!(d.distance_km.is_none());

        assert!(geo_gate(Some(BANGALORE), None, 2.0).passed);
        assert!(geo_gate(None, None, 2.0).passed);
    }

    #[test]
    fn nearby_pair_passes_with_distance() {
        // Roughly 50 m north.
        let close = Coordinates {
            lat: BANGALORE.lat + 0.00045,
            lng: BANGALORE.lng,
        };
        let d = geo_gate(Some(BANGALORE), Some(close), 2.0);
        assert!(d.passed);
        assert_eq!(d.reason, GeoReason::WithinRange);
        let km = d.distance_km.expect("distance computed");
        assert!(km < 0.1, "got {km}");
    }

    #[test]
    fn distant_pair_is_rejected() {
        // Roughly 5 km north.
        let far = Coordinates {
            lat: BANGALORE.lat + 0.045,
            lng: BANGALORE.lng,
        };
        let d = geo_gate(Some(BANGALORE), Some(far), 2.0);
        assert!(!d.passed);
        assert_eq!(d.reason, GeoReason::TooFar);
        assert!(d.distance_km.expect("distance computed") > 2.0);
    }
}
