//! Prelude module for common mapview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapview::prelude::*;`

pub use crate::core::{
    builder::MapViewBuilder,
    config::{ContainerSize, Dimension, MapViewConfig, MapViewProfile, ReplacePolicy},
    geo::{LatLng, LatLngBounds},
    state::MapState,
    view::MapView,
};

pub use crate::events::{MarkerClickSink, MarkerClickStream};

pub use crate::host::{unique_container_id, Container, ViewHost};

pub use crate::markers::{MarkerEntry, MarkerSpec};

pub use crate::providers::MapProvider;

#[cfg(feature = "headless")]
pub use crate::providers::headless::{HeadlessError, HeadlessProvider, HeadlessSurface};

pub use crate::store::{ChannelStore, LogLevel, LogRecord, MapStore, StoreMessage};

pub use crate::{Error as MapError, Result};

pub use fxhash::FxHashMap as HashMap;

pub use futures::{Stream, StreamExt};
