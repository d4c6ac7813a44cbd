use crate::fetch::JsonFetcher;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

/// Resolve a human-readable address for a point.
///
/// Degraded geocoding is not an error at this boundary: any failure —
/// transport, non-OK status, malformed body, zero results — is logged and
/// the caller gets a 6-decimal coordinate string instead.
pub async fn reverse_geocode(
    fetcher: &dyn JsonFetcher,
    cfg: &GeocoderConfig,
    lat: f64,
    lng: f64,
) -> String {
    let url = format!(
        "{}/geocode/json?latlng={lat},{lng}&key={}",
        cfg.base_url.trim_end_matches('/'),
        cfg.api_key
    );
    let fallback = format!("{lat:.6}, {lng:.6}");

    let raw = match fetcher.get_json(&url).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, lat, lng, "reverse geocode failed, using coordinate fallback");
            return fallback;
        }
    };

    match serde_json::from_value::<GeocodeResponse>(raw) {
        Ok(resp) if resp.status == "OK" => match resp.results.into_iter().next() {
            Some(result) => result.formatted_address,
            None => fallback,
        },
        Ok(resp) => {
            tracing::debug!(status = %resp.status, lat, lng, "geocoder returned no result");
            fallback
        }
        Err(e) => {
            tracing::warn!(error = %e, "malformed geocoder response");
            fallback
        }
    }
}
