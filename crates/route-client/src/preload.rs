use crate::memoizer::{RouteMemoizer, RouteOptions};
use crate::policy::DerivedPolicy;
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use waypoint_cache::key::GeoPoint;

/// Delay before warm-up starts, leaving the first paint's network window
/// uncontested.
pub const PRELOAD_START_DELAY: Duration = Duration::from_secs(2);

/// A commonly booked pickup/drop-off combination worth warming.
#[derive(Clone, Debug)]
pub struct PreloadRoute {
    pub pickup: GeoPoint,
    pub dropoffs: Vec<GeoPoint>,
}

impl PreloadRoute {
    fn waypoints(&self) -> Vec<GeoPoint> {
        let mut wps = Vec::with_capacity(1 + self.dropoffs.len());
        wps.push(self.pickup);
        wps.extend_from_slice(&self.dropoffs);
        wps
    }
}

/// Warm the route cache for a fixed set of common routes.
///
/// Strictly best-effort: every failure is logged and swallowed, and one
/// bad entry never stops the rest of the batch. Concurrency is capped by
/// the policy's request limit. Returns the number of routes warmed.
pub async fn preload(
    memoizer: Arc<RouteMemoizer>,
    routes: Vec<PreloadRoute>,
    policy: &DerivedPolicy,
    initial_delay: Duration,
) -> usize {
    if !initial_delay.is_zero() {
        tokio::time::sleep(initial_delay).await;
    }

    let total = routes.len();
    let opts = RouteOptions {
        ttl_factor: policy.cache_ttl_factor,
        ..RouteOptions::default()
    };
    let warmed = AtomicUsize::new(0);

    stream::iter(routes)
        .for_each_concurrent(policy.max_concurrent_requests.max(1), |route| {
            let memoizer = Arc::clone(&memoizer);
            let warmed = &warmed;
            async move {
                let waypoints = route.waypoints();
                match memoizer.fetch_route(&waypoints, &opts).await {
                    Ok(_) => {
                        warmed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, pickup = ?route.pickup, "route preload failed");
                    }
                }
            }
        })
        .await;

    let warmed = warmed.load(Ordering::Relaxed);
    tracing::info!(warmed, total, "route preload finished");
    warmed
}

/// Background variant used at application start: fixed 2-second delay,
/// skipped entirely when the network policy says preloading is off.
pub fn spawn_preload(
    memoizer: Arc<RouteMemoizer>,
    routes: Vec<PreloadRoute>,
    policy: DerivedPolicy,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !policy.preload_enabled {
            tracing::info!("route preload disabled by network policy");
            return;
        }
        preload(memoizer, routes, &policy, PRELOAD_START_DELAY).await;
    })
}
