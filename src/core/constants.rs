//! Core constants shared by the view, its configuration and the bundled backends.
//! Keeping them in a single place makes it easier to tweak engine-wide defaults.

/// Zoom level used when neither the store nor the caller supplies one.
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Marker color used when a spec leaves it unset.
pub const DEFAULT_MARKER_COLOR: &str = "#3388ff";

/// Prefix for generated container ids.
pub const CONTAINER_ID_PREFIX: &str = "map-view";
