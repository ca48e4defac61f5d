//! Engine configuration

use crate::types::{
    EngineError, DEFAULT_PREVIEW_COUNT, LOCK_DELAY_MS, LOCK_RESET_LIMIT, MAX_PREVIEW_COUNT,
};

/// Tunables for a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Randomizer seed; the same seed replays the same piece sequence
    pub seed: u32,
    pub lock_delay_ms: u32,
    pub max_lock_resets: u8,
    /// Number of queued pieces exposed as preview (1..=7)
    pub preview_count: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            lock_delay_ms: LOCK_DELAY_MS,
            max_lock_resets: LOCK_RESET_LIMIT,
            preview_count: DEFAULT_PREVIEW_COUNT,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Read overrides from `BLOCKFALL_*` environment variables
    ///
    /// Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`], reading values through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup("BLOCKFALL_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let lock_delay_ms = lookup("BLOCKFALL_LOCK_DELAY_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.lock_delay_ms);

        let max_lock_resets = lookup("BLOCKFALL_MAX_LOCK_RESETS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_lock_resets);

        let preview_count = lookup("BLOCKFALL_PREVIEW_COUNT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.preview_count);

        Self {
            seed,
            lock_delay_ms,
            max_lock_resets,
            preview_count,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.preview_count == 0 || self.preview_count as usize > MAX_PREVIEW_COUNT {
            return Err(EngineError::InvalidConfig("preview_count must be in 1..=7"));
        }
        if self.lock_delay_ms == 0 {
            return Err(EngineError::InvalidConfig("lock_delay_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.lock_delay_ms, 500);
        assert_eq!(config.max_lock_resets, 15);
        assert_eq!(config.preview_count, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides_and_fallbacks() {
        let config = EngineConfig::from_lookup(|key| match key {
            "BLOCKFALL_SEED" => Some("42".to_string()),
            "BLOCKFALL_LOCK_DELAY_MS" => Some(" 300 ".to_string()),
            "BLOCKFALL_PREVIEW_COUNT" => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config.seed, 42);
        assert_eq!(config.lock_delay_ms, 300);
        assert_eq!(config.max_lock_resets, 15);
        assert_eq!(config.preview_count, 5);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = EngineConfig {
            preview_count: 8,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(EngineError::InvalidConfig("preview_count must be in 1..=7"))
        );

        let config = EngineConfig {
            lock_delay_ms: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = EngineConfig::from_env();
    }
}
