use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use ua_types::DateTime;

/// Inclusivity of the RawModified time window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowBounds {
    /// `start < t < end`. Samples stamped exactly at either bound are dropped.
    #[default]
    Exclusive,
    /// `start <= t <= end`.
    Inclusive,
}

impl WindowBounds {
    pub fn contains(&self, start: DateTime, end: DateTime, t: DateTime) -> bool {
        match self {
            Self::Exclusive => start < t && t < end,
            Self::Inclusive => start <= t && t <= end,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub window_bounds: WindowBounds,
    /// Server-side cap on samples returned per node; 0 means unlimited.
    pub max_values_per_node: u32,
}

impl HistoryConfig {
    /// The effective sample cap given the request's own limit (0 = unlimited).
    pub fn value_limit(&self, requested: u32) -> Option<usize> {
        match (requested, self.max_values_per_node) {
            (0, 0) => None,
            (0, cap) | (cap, 0) => Some(cap as usize),
            (a, b) => Some(a.min(b) as usize),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Items of one batch processed concurrently. Results keep input order.
    pub max_concurrent_items: usize,
    pub history: HistoryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_items: 16,
            history: HistoryConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(s: &str) -> ServiceResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.max_concurrent_items == 0 {
            return Err(ServiceError::Config(
                "max_concurrent_items must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
