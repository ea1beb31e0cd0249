//! Session timing and balance constants.

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Tunable constants for one night. The defaults are the shipped balance;
/// shells may load overrides from a JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Wall-clock length of one in-game hour.
    pub hour_length_ms: u64,
    /// Period of the power-drain tick.
    pub power_tick_ms: u64,
    /// Period of the adversary movement tick.
    pub adversary_tick_ms: u64,
    /// How long the intro screen holds before the shift starts on its own.
    pub intro_length_ms: u64,
    /// Ticks an agent tolerates an open door before attacking.
    pub door_patience_ticks: u8,
    /// Power drained per usage unit per power tick.
    pub drain_per_usage: f32,
    /// Surviving to this hour wins the night.
    pub final_hour: u8,
    /// Upper bound (exclusive) of the per-tick aggression draw.
    pub aggression_draw_range: u8,
    /// Outage sequence: darkness before the stage figure shows itself.
    pub outage_reveal_delay_ms: u64,
    /// Outage sequence: how long the figure stays visible.
    pub outage_reveal_hold_ms: u64,
    /// Outage sequence: final blackout before the attack.
    pub outage_blackout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hour_length_ms: 30_000,
            power_tick_ms: 1_000,
            adversary_tick_ms: 3_000,
            intro_length_ms: 7_000,
            door_patience_ticks: 2,
            drain_per_usage: 0.2,
            final_hour: 6,
            aggression_draw_range: 20,
            outage_reveal_delay_ms: 7_000,
            outage_reveal_hold_ms: 15_000,
            outage_blackout_ms: 2_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config field `{}` must be positive", self.field)
    }
}

impl SessionConfig {
    /// Reject configs that would stall the scheduler or divide by zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, u64); 6] = [
            ("hour_length_ms", self.hour_length_ms),
            ("power_tick_ms", self.power_tick_ms),
            ("adversary_tick_ms", self.adversary_tick_ms),
            ("intro_length_ms", self.intro_length_ms),
            ("final_hour", u64::from(self.final_hour)),
            ("aggression_draw_range", u64::from(self.aggression_draw_range)),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError { field });
            }
        }
        if self.drain_per_usage <= 0.0 {
            return Err(ConfigError { field: "drain_per_usage" });
        }
        Ok(())
    }

    /// Stable hash of the config contents, stamped into journal headers so a
    /// replay can detect it was recorded under different balance.
    pub fn content_hash(&self) -> u64 {
        serde_json::to_string(self).map_or(0, |json| xxh3_64(json.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_matches_shipped_balance() {
        let config = SessionConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.hour_length_ms, 30_000);
        assert_eq!(config.power_tick_ms, 1_000);
        assert_eq!(config.adversary_tick_ms, 3_000);
        assert_eq!(config.door_patience_ticks, 2);
        assert_eq!(config.final_hour, 6);
        assert_eq!(config.aggression_draw_range, 20);
    }

    #[test]
    fn zero_period_is_rejected() {
        let config = SessionConfig { power_tick_ms: 0, ..SessionConfig::default() };
        let err = config.validate().expect_err("zero power tick should be rejected");
        assert_eq!(err.field, "power_tick_ms");
    }

    #[test]
    fn zero_draw_range_is_rejected() {
        let config = SessionConfig { aggression_draw_range: 0, ..SessionConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn content_hash_tracks_config_changes() {
        let base = SessionConfig::default();
        let tweaked = SessionConfig { final_hour: 7, ..SessionConfig::default() };
        assert_eq!(base.content_hash(), SessionConfig::default().content_hash());
        assert_ne!(base.content_hash(), tweaked.content_hash());
    }
}
