//! Map backend abstraction
//!
//! Each map backend implements [`MapProvider`] once. The view drives it and
//! owns everything it returns: the map object and one handle per marker.

use async_trait::async_trait;

use crate::{
    core::{geo::LatLng, state::MapState},
    events::MarkerClickSink,
    host::Container,
    markers::MarkerSpec,
    Result,
};

#[cfg(feature = "headless")]
pub mod headless;

#[async_trait]
pub trait MapProvider: Send {
    /// Live map object created by [`MapProvider::load`]
    type Map: Send;
    /// Opaque per-marker handle
    type MarkerHandle: Send;

    fn name(&self) -> &str;

    /// Creates a map inside `container`. May suspend while the backend loads.
    ///
    /// Errors are returned to the view's caller unchanged.
    async fn load(&mut self, container: &Container, state: &MapState) -> Result<Self::Map>;

    /// Routes clicks on markers of `map` into `sink`
    fn on_marker_click(&mut self, map: &mut Self::Map, sink: MarkerClickSink);

    fn add_marker(&mut self, map: &mut Self::Map, name: &str, spec: &MarkerSpec)
        -> Self::MarkerHandle;

    fn remove_marker(&mut self, map: &mut Self::Map, handle: Self::MarkerHandle);

    fn set_center(&mut self, map: &mut Self::Map, position: LatLng);

    fn set_zoom(&mut self, map: &mut Self::Map, zoom: f64);

    /// Tears down the map object
    fn remove_map(&mut self, map: Self::Map);

    /// Folds what the backend currently displays into `state` before it is
    /// published to the store. Backends that cannot report bounds keep the default.
    fn refresh_state(&mut self, _map: &Self::Map, _state: &mut MapState) {}
}
