//! # mapview
//!
//! A provider-agnostic map view layer.
//!
//! Applications drive any map backend through one contract: load a map into
//! a container, move the viewport, add and remove point markers, and listen
//! for marker clicks. The view keeps the application's store in sync with
//! what the map displays (center, zoom, bounds).

pub mod core;
pub mod events;
pub mod host;
pub mod markers;
pub mod prelude;
pub mod providers;
pub mod store;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapViewBuilder,
    config::{MapViewConfig, MapViewProfile, ReplacePolicy},
    geo::{LatLng, LatLngBounds},
    state::MapState,
    view::MapView,
};

pub use events::{MarkerClickSink, MarkerClickStream};

pub use host::{Container, ViewHost};

pub use markers::{MarkerEntry, MarkerSpec};

pub use providers::MapProvider;

#[cfg(feature = "headless")]
pub use providers::headless::{HeadlessProvider, HeadlessSurface};

pub use store::{ChannelStore, LogLevel, LogRecord, MapStore, StoreMessage};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Map is not initialized; call load_map first")]
    NotInitialized,

    #[error("Map is already initialized")]
    AlreadyInitialized,

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Invalid coordinates: ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
