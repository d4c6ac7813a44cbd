//! Client-side caching layer for the delivery-booking map: a memoized
//! driving-directions client, a degradable reverse geocoder, a
//! network-adaptive request policy, and best-effort cache preloading.
//!
//! All networking goes through the [`fetch::JsonFetcher`] seam so tests
//! (and embedders with their own HTTP stack) can substitute it.

pub mod fetch;
pub mod geocode;
pub mod memoizer;
pub mod policy;
pub mod preload;
pub mod provider;
