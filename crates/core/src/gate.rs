//! Probabilistic reply gate.
//!
//! The bot aims to post roughly once per threshold window: the reply chance
//! ramps linearly from `min_chance` right after a post to `max_chance` once
//! `threshold_hours` have elapsed, clamped outside that range. Randomness is
//! the caller's concern; the gate only compares against a supplied sample.

use crate::config::BotConfig;

/// Chance of replying after `hours_since_post` idle hours.
///
/// An infinite idle time (the bot has never posted) yields `max_chance`.
pub fn reply_chance(hours_since_post: f64, config: &BotConfig) -> f64 {
    if hours_since_post <= 0.0 {
        return config.min_chance;
    }
    if config.threshold_hours <= 0.0 || hours_since_post >= config.threshold_hours {
        return config.max_chance;
    }
    let t = hours_since_post / config.threshold_hours;
    config.min_chance + (config.max_chance - config.min_chance) * t
}

/// Decide whether to reply. A mention always replies; otherwise the
/// interpolated chance must exceed `sample` (a uniform draw from [0, 1)).
pub fn should_reply(mentioned: bool, hours_since_post: f64, config: &BotConfig, sample: f64) -> bool {
    if mentioned {
        return true;
    }
    reply_chance(hours_since_post, config) > sample
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_clamping() {
        let config = BotConfig::default();
        assert_eq!(reply_chance(0.0, &config), 0.05);
        assert_eq!(reply_chance(-3.0, &config), 0.05);
        assert_eq!(reply_chance(10.0, &config), 0.95);
        assert_eq!(reply_chance(500.0, &config), 0.95);
        assert_eq!(reply_chance(f64::INFINITY, &config), 0.95);
    }

    #[test]
    fn test_midpoint_interpolation() {
        let config = BotConfig::default();
        let chance = reply_chance(5.0, &config);
        assert!((chance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_threshold_jumps_to_max() {
        let mut config = BotConfig::default();
        config.threshold_hours = 0.0;
        assert_eq!(reply_chance(0.5, &config), config.max_chance);
    }

    #[test]
    fn test_mention_overrides_sample() {
        let config = BotConfig::default();
        assert!(should_reply(true, 0.0, &config, 1.0));
    }

    #[test]
    fn test_sample_comparison_is_strict() {
        let config = BotConfig::default();
        // chance == sample does not reply
        assert!(!should_reply(false, 5.0, &config, 0.5));
        assert!(should_reply(false, 5.0, &config, 0.49));
        assert!(!should_reply(false, 5.0, &config, 0.51));
    }
}
