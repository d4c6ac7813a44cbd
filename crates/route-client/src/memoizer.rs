use crate::fetch::{FetchError, JsonFetcher};
use crate::provider::{directions_url, OverviewDetail, ProviderConfig, RouteResponse, TravelProfile};
use std::sync::Arc;
use std::time::Duration;
use waypoint_cache::key::{route_key, GeoPoint};
use waypoint_cache::store::{StoreStats, TtlCache, TtlCacheConfig};

/// Freshness window for a direct pickup→dropoff route.
pub const DIRECT_ROUTE_TTL: Duration = Duration::from_secs(30 * 60);

/// Multi-stop routes get a shorter window: users re-order stops often
/// enough that a long-lived geometry goes stale in practice.
pub const MULTI_STOP_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Non-2xx answer from the directions provider.
    #[error("directions provider returned HTTP {status}: {body}")]
    ProviderUnavailable { status: u16, body: String },
    /// 2xx answer with zero route candidates.
    #[error("no route found for the requested waypoints")]
    NoRouteFound,
    /// Connection-level failure before any HTTP status was seen.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<FetchError> for RouteError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status { status, body } => RouteError::ProviderUnavailable { status, body },
            FetchError::Transport(msg) => RouteError::Transport(msg),
        }
    }
}

/// Request shaping knobs. `optimize_waypoints: None` means "optimize
/// whenever the request has intermediate stops" (more than two waypoints).
#[derive(Clone, Copy, Debug)]
pub struct RouteOptions {
    pub profile: TravelProfile,
    pub overview: OverviewDetail,
    pub optimize_waypoints: Option<bool>,
    /// TTL multiplier taken from the current network policy.
    pub ttl_factor: u32,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            profile: TravelProfile::Driving,
            overview: OverviewDetail::Full,
            optimize_waypoints: None,
            ttl_factor: 1,
        }
    }
}

/// Cache-first wrapper around the directions provider.
///
/// One outbound call per miss, one store write per success, nothing at all
/// on a hit. No retries — a provider failure propagates to the caller
/// untouched. Concurrent misses for the same key each fetch and the last
/// write wins; the duplicate request is accepted rather than coalesced.
pub struct RouteMemoizer {
    cache: TtlCache<Arc<RouteResponse>>,
    fetcher: Arc<dyn JsonFetcher>,
    provider: ProviderConfig,
    direct_ttl: Duration,
    multi_stop_ttl: Duration,
}

impl RouteMemoizer {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        provider: ProviderConfig,
        cache: TtlCacheConfig,
    ) -> Self {
        Self {
            cache: TtlCache::new(cache),
            fetcher,
            provider,
            direct_ttl: DIRECT_ROUTE_TTL,
            multi_stop_ttl: MULTI_STOP_TTL,
        }
    }

    /// Override the freshness windows. Defaults are [`DIRECT_ROUTE_TTL`]
    /// and [`MULTI_STOP_TTL`]; tests shrink them to probe expiry.
    pub fn with_route_ttls(mut self, direct: Duration, multi_stop: Duration) -> Self {
        self.direct_ttl = direct;
        self.multi_stop_ttl = multi_stop;
        self
    }

    /// Cache-first route lookup. A hit short-circuits all network activity.
    pub async fn fetch_route(
        &self,
        waypoints: &[GeoPoint],
        opts: &RouteOptions,
    ) -> Result<Arc<RouteResponse>, RouteError> {
        let key = route_key(waypoints);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(key = %key, "route cache HIT");
            return Ok(cached);
        }

        let optimize = opts.optimize_waypoints.unwrap_or(waypoints.len() > 2);
        let url = directions_url(&self.provider, opts.profile, waypoints, opts.overview, optimize);

        let raw = self.fetcher.get_json(&url).await?;
        let response: RouteResponse = serde_json::from_value(raw)?;

        if response.routes.is_empty() {
            return Err(RouteError::NoRouteFound);
        }

        let ttl = self.ttl_for(waypoints.len(), opts.ttl_factor);
        let response = Arc::new(response);
        self.cache
            .insert_with_ttl(key.clone(), Arc::clone(&response), ttl);
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "route cache MISS → stored");

        Ok(response)
    }

    pub fn cache_stats(&self) -> StoreStats {
        self.cache.stats()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Direct two-point routes get the long window, multi-stop the short
    /// one, scaled by the policy's TTL factor.
    fn ttl_for(&self, waypoint_count: usize, ttl_factor: u32) -> Duration {
        let base = if waypoint_count > 2 {
            self.multi_stop_ttl
        } else {
            self.direct_ttl
        };
        base * ttl_factor.max(1)
    }
}
