//! Asset context handed to the map builder.

use std::collections::{BTreeMap, BTreeSet};

use wayfarer_core::{LocationId, LocationSource};

/// Location sources and tileset names available to the world, keyed by id.
///
/// Adapters decode the documents and register them here; the world only
/// looks them up while building maps.
#[derive(Clone, Debug, Default)]
pub struct Assets {
    locations: BTreeMap<LocationId, LocationSource>,
    tilesets: BTreeSet<String>,
}

impl Assets {
    /// Creates an empty asset context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location source, returning the one it replaced.
    pub fn insert_location(
        &mut self,
        location: LocationId,
        source: LocationSource,
    ) -> Option<LocationSource> {
        self.locations.insert(location, source)
    }

    /// Registers a tileset name so tile layers referring to it resolve.
    pub fn register_tileset(&mut self, name: impl Into<String>) {
        let _ = self.tilesets.insert(name.into());
    }

    /// Looks up the source registered for a location.
    #[must_use]
    pub fn location(&self, location: &LocationId) -> Option<&LocationSource> {
        self.locations.get(location)
    }

    /// Reports whether the tileset was registered.
    #[must_use]
    pub fn has_tileset(&self, name: &str) -> bool {
        self.tilesets.contains(name)
    }

    /// Iterator over the registered location ids in ascending order.
    pub fn location_ids(&self) -> impl Iterator<Item = &LocationId> {
        self.locations.keys()
    }
}
