//! Transform configuration
//!
//! Everything a host tunes about the transforms, loadable from JSON. Missing
//! fields take their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{TransformError, TransformResult};

/// Table classes that are never collapsed
pub const DEFAULT_COLLAPSE_BLACKLIST: &[&str] = &[
    "navbox",
    "vertical-navbox",
    "navbox-inner",
    "metadata",
    "mbox-small",
];

/// Transform settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Article title; headers equal to it are left out of captions
    pub page_title: Option<String>,
    /// The wiki main page is never collapsed
    pub is_main_page: bool,
    /// Caption title for infobox tables
    pub infobox_label: String,
    /// Caption title for every other table
    pub other_label: String,
    /// Text of the footer toggle
    pub footer_label: String,
    /// Viewport heights of margin before an image is loaded
    pub load_distance_multiplier: f64,
    /// Minimum time between two lazy load passes, in milliseconds
    pub throttle_period_ms: u64,
    /// Table classes excluded from collapsing
    pub collapse_blacklist: Vec<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            page_title: None,
            is_main_page: false,
            infobox_label: "Quick facts".to_string(),
            other_label: "More information".to_string(),
            footer_label: "Close".to_string(),
            load_distance_multiplier: 1.0,
            throttle_period_ms: 100,
            collapse_blacklist: DEFAULT_COLLAPSE_BLACKLIST.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TransformConfig {
    pub fn throttle_period(&self) -> Duration {
        Duration::from_millis(self.throttle_period_ms)
    }

    /// Reject values no pass can work with
    pub fn validate(&self) -> TransformResult<()> {
        if !self.load_distance_multiplier.is_finite() || self.load_distance_multiplier < 0.0 {
            return Err(TransformError::InvalidConfig(format!(
                "load_distance_multiplier must be a non-negative number, got {}",
                self.load_distance_multiplier
            )));
        }
        if self.throttle_period_ms == 0 {
            return Err(TransformError::InvalidConfig("throttle_period_ms must be positive".into()));
        }
        Ok(())
    }
}
