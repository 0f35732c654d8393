//! Throttle profile resolution: connector-assigned profile, else the
//! configured default, else a built-in fallback. Deterministic and cheap
//! enough to call on every dispatch without caching.

#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleProfile {
    pub name: String,
    pub requests_per_minute: i32,
    pub daily_budget: Option<i32>,
    pub batch_size: i32,
    pub batch_cooldown_seconds: i32,
    pub rate_limit_pause_seconds: i32,
}

/// Used when no profile row exists at all, e.g. a fresh install with no
/// seeded `throttle_profiles` rows.
pub const BUILT_IN_DEFAULT_PROFILE: ThrottleProfile = ThrottleProfile {
    name: String::new(),
    requests_per_minute: 5,
    daily_budget: Some(200),
    batch_size: 5,
    batch_cooldown_seconds: 60,
    rate_limit_pause_seconds: 300,
};

/// `assigned` is the connector's own profile, if set. `default` is whichever
/// profile row has `is_default = true`. Falls back to the built-in constant
/// when both are absent.
pub fn resolve_profile(assigned: Option<ThrottleProfile>, default: Option<ThrottleProfile>) -> ThrottleProfile {
    assigned.or(default).unwrap_or_else(|| ThrottleProfile {
        name: "built-in-default".to_string(),
        ..BUILT_IN_DEFAULT_PROFILE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> ThrottleProfile {
        ThrottleProfile {
            name: name.to_string(),
            requests_per_minute: 10,
            daily_budget: None,
            batch_size: 1,
            batch_cooldown_seconds: 1,
            rate_limit_pause_seconds: 1,
        }
    }

    #[test]
    fn prefers_the_connector_assigned_profile() {
        let resolved = resolve_profile(Some(profile("assigned")), Some(profile("default")));
        assert_eq!(resolved.name, "assigned");
    }

    #[test]
    fn falls_back_to_default_then_built_in() {
        assert_eq!(resolve_profile(None, Some(profile("default"))).name, "default");
        assert_eq!(resolve_profile(None, None).name, "built-in-default");
    }
}
