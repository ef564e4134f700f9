//! Configuration for map view behavior
//!
//! A view is configured through presets or a custom `MapViewConfig`, which can
//! also be loaded from JSON so host applications can keep it next to their
//! other settings.

use serde::{Deserialize, Serialize};

use crate::{MapError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum MapViewProfile {
    /// Replace duplicate markers cleanly and forward log records to the store
    Standard,
    /// Keep log records out of the store; only state updates are dispatched
    Quiet,
    Custom(MapViewConfig),
}

impl MapViewProfile {
    pub fn resolve(&self) -> MapViewConfig {
        match self {
            Self::Standard => MapViewConfig {
                container_size: ContainerSize::default(),
                replace_policy: ReplacePolicy::DestroyThenReplace,
                log_to_store: true,
            },
            Self::Quiet => MapViewConfig {
                container_size: ContainerSize::default(),
                replace_policy: ReplacePolicy::DestroyThenReplace,
                log_to_store: false,
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for MapViewProfile {
    fn default() -> Self {
        Self::Standard
    }
}

/// What `add_marker` does when the reference name already holds a live marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Remove the previous provider marker, then create the new one
    DestroyThenReplace,
    /// Drop the previous handle without asking the provider to remove it
    Overwrite,
}

impl Default for ReplacePolicy {
    fn default() -> Self {
        Self::DestroyThenReplace
    }
}

/// One axis of the container size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Fraction of the host surface, 1.0 filling it completely
    Relative(f64),
    Pixels(u32),
}

impl Dimension {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Relative(fraction) => *fraction <= 0.0,
            Self::Pixels(px) => *px == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl Default for ContainerSize {
    fn default() -> Self {
        Self {
            width: Dimension::Relative(1.0),
            height: Dimension::Relative(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub container_size: ContainerSize,
    pub replace_policy: ReplacePolicy,
    pub log_to_store: bool,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        MapViewProfile::default().resolve()
    }
}

impl MapViewConfig {
    /// Parses and validates a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(MapError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.container_size.width.is_empty() || self.container_size.height.is_empty() {
            return Err(MapError::Config("container size must be non-zero".to_string()).into());
        }
        Ok(())
    }
}
