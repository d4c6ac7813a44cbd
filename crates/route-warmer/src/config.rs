use route_client::geocode::GeocoderConfig;
use route_client::policy::NetworkProfile;
use route_client::provider::ProviderConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use waypoint_cache::store::TtlCacheConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub geocoder: Option<GeocoderConfig>,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Telemetry override supplied by the operator; absent means the
    /// runtime cannot report link quality and the optimistic default
    /// policy applies.
    #[serde(default)]
    pub network: Option<NetworkProfile>,
    #[serde(default)]
    pub preload: Vec<PreloadEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
    #[serde(default = "default_eviction_fraction")]
    pub eviction_fraction: f64,
}

/// A `[[preload]]` table: `pickup = [lon, lat]`, `dropoffs = [[lon, lat], ...]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadEntry {
    pub pickup: [f64; 2],
    #[serde(default)]
    pub dropoffs: Vec<[f64; 2]>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl CacheConfig {
    pub fn to_store_config(&self) -> TtlCacheConfig {
        TtlCacheConfig {
            default_ttl: Duration::from_secs(self.default_ttl_seconds),
            max_entries: self.capacity,
            eviction_fraction: self.eviction_fraction,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            default_ttl_seconds: default_ttl_seconds(),
            eviction_fraction: default_eviction_fraction(),
        }
    }
}

fn default_capacity() -> usize {
    100
}
fn default_ttl_seconds() -> u64 {
    1800
}
fn default_eviction_fraction() -> f64 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let raw = r#"
            [provider]
            base_url = "https://directions.example.com"
            access_token = "tok"

            [geocoder]
            base_url = "https://geocoder.example.com"
            api_key = "gkey"

            [cache]
            capacity = 50

            [network]
            effective_type = "2g"
            downlink_mbps = 0.5
            rtt_ms = 1200

            [[preload]]
            pickup = [-3.7038, 40.4168]
            dropoffs = [[-3.6920, 40.4203], [-3.7000, 40.4100]]
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.cache.capacity, 50);
        // Unset fields take their defaults.
        assert_eq!(config.cache.default_ttl_seconds, 1800);
        assert!(config.network.unwrap().is_slow());
        assert_eq!(config.preload.len(), 1);
        assert_eq!(config.preload[0].dropoffs.len(), 2);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let raw = r#"
            [provider]
            base_url = "https://directions.example.com"
            access_token = "tok"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.geocoder.is_none());
        assert!(config.network.is_none());
        assert!(config.preload.is_empty());
        assert_eq!(config.cache.to_store_config().max_entries, 100);
    }
}
