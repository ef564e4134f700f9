use crate::prelude::HashMap;

/// Marker handles keyed by reference name.
///
/// Every key maps to a marker the provider currently renders. Handles move
/// out of the registry in the same step they are handed back to the provider,
/// so no entry ever points at a destroyed marker.
pub(crate) struct MarkerRegistry<H> {
    markers: HashMap<String, H>,
}

impl<H> MarkerRegistry<H> {
    pub fn new() -> Self {
        Self {
            markers: HashMap::default(),
        }
    }

    /// Stores a handle, returning the one previously held under `name`
    pub fn insert(&mut self, name: &str, handle: H) -> Option<H> {
        self.markers.insert(name.to_string(), handle)
    }

    /// Removes and returns the handle for `name`
    pub fn take(&mut self, name: &str) -> Option<H> {
        self.markers.remove(name)
    }

    /// Removes every entry, yielding the handles in iteration order
    pub fn drain(&mut self) -> Vec<(String, H)> {
        self.markers.drain().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.markers.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.markers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }
}
