use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Input for creating a point marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub title: String,
    pub position: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MarkerSpec {
    pub fn new(title: impl Into<String>, position: LatLng) -> Self {
        Self {
            title: title.into(),
            position,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Color to render with, falling back to the engine default
    pub fn color_or_default(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_MARKER_COLOR)
    }
}

/// A named marker, as accepted by `MapView::add_markers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEntry {
    pub name: String,
    pub spec: MarkerSpec,
}

impl MarkerEntry {
    pub fn new(name: impl Into<String>, spec: MarkerSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

impl<N: Into<String>> From<(N, MarkerSpec)> for MarkerEntry {
    fn from((name, spec): (N, MarkerSpec)) -> Self {
        Self::new(name, spec)
    }
}
