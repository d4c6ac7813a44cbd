//! In-memory caches for the delivery-booking map experience: a generic
//! TTL-bounded, size-bounded store, a coordinate-sequence key codec, and a
//! single-purpose map-style cache. No I/O — callers own all networking.

pub mod key;
pub mod store;
pub mod style;
