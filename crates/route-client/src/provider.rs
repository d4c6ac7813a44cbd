use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;
use waypoint_cache::key::GeoPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    Driving,
    Walking,
    Cycling,
}

impl TravelProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
        }
    }
}

/// How much route geometry to request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewDetail {
    Full,
    Simplified,
    None,
}

impl OverviewDetail {
    /// Wire value; the provider spells "no overview" as `false`.
    pub fn as_str(self) -> &'static str {
        match self {
            OverviewDetail::Full => "full",
            OverviewDetail::Simplified => "simplified",
            OverviewDetail::None => "false",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub access_token: String,
}

/// Build the directions request URL for an ordered waypoint sequence.
///
/// Step-by-step instructions are always disabled and only the
/// distance/duration annotations are requested — callers never consume
/// turn-by-turn data. Path coordinates carry 6 decimals; the cache key's
/// 4-decimal rounding applies to the key only, not to what the provider
/// receives.
pub fn directions_url(
    cfg: &ProviderConfig,
    profile: TravelProfile,
    waypoints: &[GeoPoint],
    overview: OverviewDetail,
    optimize: bool,
) -> String {
    let mut path = String::with_capacity(waypoints.len() * 22);
    for (i, wp) in waypoints.iter().enumerate() {
        if i > 0 {
            path.push(';');
        }
        let _ = write!(path, "{:.6},{:.6}", wp.lon, wp.lat);
    }

    let mut url = format!(
        "{}/directions/v5/{}/{}?geometries=geojson&overview={}&steps=false&annotations=distance,duration",
        cfg.base_url.trim_end_matches('/'),
        profile.as_str(),
        path,
        overview.as_str(),
    );
    if optimize {
        url.push_str("&waypoints_per_route=true");
    }
    let _ = write!(url, "&access_token={}", cfg.access_token);
    url
}

/// Parsed directions response. Everything beyond "at least one candidate
/// with distance/duration/geometry" is opaque to this layer.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RouteCandidate {
    /// Total distance in meters.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
    /// GeoJSON geometry, passed through untouched.
    #[serde(default)]
    pub geometry: Value,
}

impl RouteResponse {
    /// Best candidate; providers sort fastest-first.
    pub fn primary(&self) -> Option<&RouteCandidate> {
        self.routes.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ProviderConfig {
        ProviderConfig {
            base_url: "https://directions.example.com/".to_string(),
            access_token: "tok123".to_string(),
        }
    }

    #[test]
    fn url_for_direct_route() {
        let wps = [GeoPoint::new(-3.70379, 40.41678), GeoPoint::new(-3.69196, 40.42028)];
        let url = directions_url(&cfg(), TravelProfile::Driving, &wps, OverviewDetail::Full, false);
        assert_eq!(
            url,
            "https://directions.example.com/directions/v5/driving/-3.703790,40.416780;-3.691960,40.420280\
             ?geometries=geojson&overview=full&steps=false&annotations=distance,duration&access_token=tok123"
        );
    }

    #[test]
    fn optimize_adds_waypoint_flag() {
        let wps = [
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(3.0, 4.0),
            GeoPoint::new(5.0, 6.0),
        ];
        let url = directions_url(&cfg(), TravelProfile::Driving, &wps, OverviewDetail::Full, true);
        assert!(url.contains("&waypoints_per_route=true"));
        assert!(url.contains("1.000000,2.000000;3.000000,4.000000;5.000000,6.000000"));
    }

    #[test]
    fn overview_none_spelled_false() {
        let wps = [GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)];
        let url = directions_url(&cfg(), TravelProfile::Cycling, &wps, OverviewDetail::None, false);
        assert!(url.contains("/cycling/"));
        assert!(url.contains("overview=false"));
    }

    #[test]
    fn parses_provider_payload() {
        let raw = serde_json::json!({
            "routes": [
                { "distance": 5312.4, "duration": 780.0, "geometry": { "type": "LineString", "coordinates": [] } }
            ],
            "waypoints": [],
            "code": "Ok"
        });
        let resp: RouteResponse = serde_json::from_value(raw).unwrap();
        let best = resp.primary().unwrap();
        assert_eq!(best.distance, 5312.4);
        assert_eq!(best.duration, 780.0);
    }

    #[test]
    fn missing_routes_parses_as_empty() {
        let resp: RouteResponse = serde_json::from_value(serde_json::json!({ "code": "NoRoute" })).unwrap();
        assert!(resp.routes.is_empty());
        assert!(resp.primary().is_none());
    }
}
