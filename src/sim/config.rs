use std::env;

use crate::state::get_env_var_i32;

/// Settings for one simulated game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// ASCII map to load; a map is generated when unset.
    pub map_path: Option<String>,
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub keys: usize,
    pub view_radius: i32,
    pub max_ticks: u32,
    pub lava_damage: i32,
    pub heal_rate: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_path: None,
            seed: 0,
            width: 24,
            height: 16,
            keys: 3,
            view_radius: 4,
            max_ticks: 5000,
            lava_damage: 5,
            heal_rate: 5,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            map_path: env::var("NAVBOT_MAP").ok().filter(|path| !path.is_empty()),
            seed: get_env_var_i32("NAVBOT_SEED").map_or(defaults.seed, |seed| seed.max(0) as u64),
            width: get_env_var_i32("NAVBOT_MAP_WIDTH").unwrap_or(defaults.width),
            height: get_env_var_i32("NAVBOT_MAP_HEIGHT").unwrap_or(defaults.height),
            keys: get_env_var_i32("NAVBOT_KEYS").map_or(defaults.keys, |keys| keys.clamp(0, 9) as usize),
            view_radius: get_env_var_i32("NAVBOT_VIEW_RADIUS").unwrap_or(defaults.view_radius),
            max_ticks: get_env_var_i32("NAVBOT_MAX_TICKS")
                .map_or(defaults.max_ticks, |ticks| ticks.max(1) as u32),
            lava_damage: get_env_var_i32("NAVBOT_LAVA_DAMAGE").unwrap_or(defaults.lava_damage),
            heal_rate: get_env_var_i32("NAVBOT_HEAL_RATE").unwrap_or(defaults.heal_rate),
        }
    }
}
