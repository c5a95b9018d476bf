//! Buffer configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How an owned buffer enlarges itself when a write does not fit.
///
/// The new capacity is `max(needed, capacity * factor_percent / 100)`,
/// rounded up to a multiple of `align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    /// Geometric growth factor in percent. Must be at least 100.
    pub factor_percent: usize,

    /// Capacity granularity in bytes. Must be a non-zero power of two.
    pub align: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            factor_percent: 150,
            align: 16,
        }
    }
}

impl GrowthPolicy {
    /// Exact growth: capacity becomes precisely what was requested.
    pub const EXACT: GrowthPolicy = GrowthPolicy {
        factor_percent: 100,
        align: 1,
    };

    pub fn validate(&self) -> Result<()> {
        if self.factor_percent < 100 {
            return Err(Error::Config(format!(
                "growth factor_percent must be >= 100, got {}",
                self.factor_percent
            )));
        }
        if !self.align.is_power_of_two() {
            return Err(Error::Config(format!(
                "growth align must be a non-zero power of two, got {}",
                self.align
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Bytes allocated up front. Zero means the buffer grows lazily.
    pub initial_capacity: usize,

    #[serde(default)]
    pub growth: GrowthPolicy,
}

impl BufferConfig {
    pub fn validate(&self) -> Result<()> {
        self.growth.validate()
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `OUTBUF_INITIAL_CAPACITY`: bytes allocated up front
    /// - `OUTBUF_GROWTH_FACTOR_PERCENT`: geometric growth factor in percent
    /// - `OUTBUF_GROWTH_ALIGN`: capacity granularity in bytes
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("OUTBUF_INITIAL_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.initial_capacity = v;
            }
        }

        if let Some(s) = lookup("OUTBUF_GROWTH_FACTOR_PERCENT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.growth.factor_percent = v;
            }
        }

        if let Some(s) = lookup("OUTBUF_GROWTH_ALIGN") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.growth.align = v;
            }
        }

        cfg
    }
}
