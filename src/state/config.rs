use std::env;

pub const DEFAULT_MIN_HEALTH: i32 = 50;
pub const DEFAULT_MAX_HEALTH: i32 = 100;

pub(crate) fn get_env_var_i32(key: &str) -> Option<i32> {
    env::var(key).ok().and_then(|val| val.parse::<i32>().ok())
}

/// Health thresholds driving the decision strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// At or below this health a healing episode starts.
    pub min_health: i32,
    /// A healing episode ends when health is exactly this value.
    pub max_health: i32,
}

impl NavigatorConfig {
    /// Reads `NAVBOT_MIN_HEALTH` and `NAVBOT_MAX_HEALTH`, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            min_health: get_env_var_i32("NAVBOT_MIN_HEALTH").unwrap_or(DEFAULT_MIN_HEALTH),
            max_health: get_env_var_i32("NAVBOT_MAX_HEALTH").unwrap_or(DEFAULT_MAX_HEALTH),
        }
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            min_health: DEFAULT_MIN_HEALTH,
            max_health: DEFAULT_MAX_HEALTH,
        }
    }
}
