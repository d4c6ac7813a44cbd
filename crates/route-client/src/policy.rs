use serde::Deserialize;
use std::time::Duration;

/// Coarse link-quality classification as reported by the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum EffectiveType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
}

/// Connection telemetry, read fresh on every policy evaluation — it is
/// cheap to query and drifts over a session.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct NetworkProfile {
    pub effective_type: EffectiveType,
    pub downlink_mbps: f64,
    pub rtt_ms: u32,
    #[serde(default)]
    pub data_saver: bool,
}

impl NetworkProfile {
    /// A link is slow if any single signal says so.
    pub fn is_slow(&self) -> bool {
        matches!(self.effective_type, EffectiveType::Slow2g | EffectiveType::TwoG)
            || self.downlink_mbps < 1.0
            || self.rtt_ms > 1000
            || self.data_saver
    }
}

/// Request and cache behavior derived from current link quality.
/// Stateless — recompute whenever telemetry may have changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedPolicy {
    pub debounce: Duration,
    pub cache_ttl_factor: u32,
    pub max_concurrent_requests: usize,
    pub simplified_rendering: bool,
    pub preload_enabled: bool,
}

impl DerivedPolicy {
    /// Absent telemetry is treated as a good link, not as an error.
    pub fn evaluate(profile: Option<&NetworkProfile>) -> Self {
        let slow = profile.map(NetworkProfile::is_slow).unwrap_or(false);
        if slow {
            Self {
                debounce: Duration::from_millis(500),
                cache_ttl_factor: 3,
                max_concurrent_requests: 2,
                simplified_rendering: true,
                // Speculative warm-up is pure overhead on a constrained link.
                preload_enabled: false,
            }
        } else {
            Self {
                debounce: Duration::from_millis(300),
                cache_ttl_factor: 1,
                max_concurrent_requests: 5,
                simplified_rendering: false,
                preload_enabled: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(effective_type: EffectiveType, downlink_mbps: f64, rtt_ms: u32) -> NetworkProfile {
        NetworkProfile {
            effective_type,
            downlink_mbps,
            rtt_ms,
            data_saver: false,
        }
    }

    #[test]
    fn slow_link_row() {
        let p = profile(EffectiveType::TwoG, 0.5, 1200);
        let policy = DerivedPolicy::evaluate(Some(&p));
        assert_eq!(policy.debounce, Duration::from_millis(500));
        assert_eq!(policy.cache_ttl_factor, 3);
        assert_eq!(policy.max_concurrent_requests, 2);
        assert!(policy.simplified_rendering);
        assert!(!policy.preload_enabled);
    }

    #[test]
    fn fast_link_row() {
        let p = profile(EffectiveType::FourG, 20.0, 40);
        let policy = DerivedPolicy::evaluate(Some(&p));
        assert_eq!(policy.debounce, Duration::from_millis(300));
        assert_eq!(policy.cache_ttl_factor, 1);
        assert_eq!(policy.max_concurrent_requests, 5);
        assert!(!policy.simplified_rendering);
        assert!(policy.preload_enabled);
    }

    #[test]
    fn any_single_slow_signal_suffices() {
        assert!(profile(EffectiveType::Slow2g, 20.0, 40).is_slow());
        assert!(profile(EffectiveType::FourG, 0.9, 40).is_slow());
        assert!(profile(EffectiveType::FourG, 20.0, 1001).is_slow());

        let mut p = profile(EffectiveType::FourG, 20.0, 40);
        p.data_saver = true;
        assert!(p.is_slow());
    }

    #[test]
    fn boundary_values_count_as_fast() {
        assert!(!profile(EffectiveType::ThreeG, 1.0, 1000).is_slow());
    }

    #[test]
    fn missing_telemetry_is_optimistic() {
        let policy = DerivedPolicy::evaluate(None);
        assert_eq!(policy.max_concurrent_requests, 5);
        assert!(policy.preload_enabled);
    }

    #[test]
    fn wire_names_deserialize() {
        let p: NetworkProfile = serde_json::from_value(serde_json::json!({
            "effective_type": "slow-2g",
            "downlink_mbps": 0.2,
            "rtt_ms": 2000
        }))
        .unwrap();
        assert_eq!(p.effective_type, EffectiveType::Slow2g);
        assert!(!p.data_saver);
    }
}
