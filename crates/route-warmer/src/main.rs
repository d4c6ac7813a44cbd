mod config;

use clap::Parser;
use config::Config;
use route_client::fetch::HttpJsonFetcher;
use route_client::geocode::reverse_geocode;
use route_client::memoizer::{RouteMemoizer, RouteOptions};
use route_client::policy::DerivedPolicy;
use route_client::preload::{spawn_preload, PreloadRoute};
use route_client::provider::TravelProfile;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use waypoint_cache::key::GeoPoint;
use waypoint_cache::style::StyleCache;

/// Warm and exercise the route cache against a live directions provider.
#[derive(Parser)]
#[command(name = "route-warmer")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// One-shot route to fetch, as "lon,lat;lon,lat[;lon,lat...]"
    #[arg(long)]
    route: Option<String>,

    /// Travel profile for the one-shot route
    #[arg(long, default_value = "driving")]
    travel_profile: String,
}

fn parse_waypoints(s: &str) -> Result<Vec<GeoPoint>, String> {
    let mut wps = Vec::new();
    for pair in s.split(';') {
        let mut parts = pair.split(',');
        let lon = parts.next().and_then(|p| p.trim().parse().ok());
        let lat = parts.next().and_then(|p| p.trim().parse().ok());
        match (lon, lat) {
            (Some(lon), Some(lat)) => wps.push(GeoPoint::new(lon, lat)),
            _ => return Err(format!("invalid coordinate pair: {pair}")),
        }
    }
    if wps.len() < 2 {
        return Err("a route needs at least two waypoints".to_string());
    }
    Ok(wps)
}

fn parse_profile(s: &str) -> TravelProfile {
    match s {
        "walking" => TravelProfile::Walking,
        "cycling" => TravelProfile::Cycling,
        _ => TravelProfile::Driving,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(c) => {
            tracing::info!(path = %args.config.display(), "loaded config");
            c
        }
        Err(e) => {
            tracing::error!(error = %e, path = %args.config.display(), "failed to load config");
            std::process::exit(1);
        }
    };

    // Policy is a pure function of whatever telemetry the operator supplied.
    let policy = DerivedPolicy::evaluate(config.network.as_ref());
    tracing::info!(
        debounce_ms = policy.debounce.as_millis() as u64,
        max_concurrent = policy.max_concurrent_requests,
        ttl_factor = policy.cache_ttl_factor,
        simplified_rendering = policy.simplified_rendering,
        preload = policy.preload_enabled,
        "network policy evaluated"
    );

    // Composition root: caches and clients are constructed here and passed
    // down explicitly — nothing module-global.
    let fetcher = Arc::new(HttpJsonFetcher::new());
    let memoizer = Arc::new(RouteMemoizer::new(
        fetcher.clone(),
        config.provider.clone(),
        config.cache.to_store_config(),
    ));
    // The map layer fills this with style documents as themes load; it
    // lives here so the whole session shares one instance.
    let style_cache: StyleCache<String> = StyleCache::new();

    let preload_routes: Vec<PreloadRoute> = config
        .preload
        .iter()
        .map(|entry| PreloadRoute {
            pickup: GeoPoint::new(entry.pickup[0], entry.pickup[1]),
            dropoffs: entry
                .dropoffs
                .iter()
                .map(|d| GeoPoint::new(d[0], d[1]))
                .collect(),
        })
        .collect();

    tracing::info!(routes = preload_routes.len(), "scheduling route preload");
    let preload_handle = spawn_preload(Arc::clone(&memoizer), preload_routes, policy);

    if let Some(route) = &args.route {
        match parse_waypoints(route) {
            Ok(waypoints) => {
                let opts = RouteOptions {
                    profile: parse_profile(&args.travel_profile),
                    ttl_factor: policy.cache_ttl_factor,
                    ..RouteOptions::default()
                };
                match memoizer.fetch_route(&waypoints, &opts).await {
                    Ok(resp) => {
                        if let Some(best) = resp.primary() {
                            tracing::info!(
                                distance_m = best.distance,
                                duration_s = best.duration,
                                candidates = resp.routes.len(),
                                "route fetched"
                            );
                        }
                        if let Some(geocoder) = &config.geocoder {
                            // parse_waypoints guarantees at least two points.
                            let first = waypoints[0];
                            let last = waypoints[waypoints.len() - 1];
                            let from =
                                reverse_geocode(fetcher.as_ref(), geocoder, first.lat, first.lon)
                                    .await;
                            let to = reverse_geocode(fetcher.as_ref(), geocoder, last.lat, last.lon)
                                .await;
                            tracing::info!(%from, %to, "route endpoints");
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "route fetch failed"),
                }
            }
            Err(e) => tracing::error!(error = %e, "bad --route argument"),
        }
    }

    let _ = preload_handle.await;

    let stats = memoizer.cache_stats();
    tracing::info!(
        size = stats.size,
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "route cache stats"
    );
    let style_stats = style_cache.stats();
    tracing::info!(size = style_stats.size, "style cache stats");
}
