use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// Displayed state of a map view: what the store mirrors after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub center: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LatLngBounds>,
    pub zoom: f64,
}

impl MapState {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            bounds: None,
            zoom,
        }
    }

    pub fn with_bounds(mut self, bounds: LatLngBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(LatLng::default(), crate::constants::DEFAULT_ZOOM)
    }
}
