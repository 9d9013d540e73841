use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::landmark::LandmarkSet;
use crate::map::{MapError, Route, VectorMap};

/// The landmark subsets a detection pass may read, frozen at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSnapshot {
    pub map: Option<Arc<VectorMap>>,
    pub all: Option<Arc<LandmarkSet>>,
    pub route: Option<Arc<LandmarkSet>>,
}

impl LandmarkSnapshot {
    /// Route subset if one is loaded, else the whole-map subset.
    pub fn authoritative(&self) -> Option<&LandmarkSet> {
        self.route.as_deref().or(self.all.as_deref())
    }
}

/// Shared handle to the current landmark subsets.
///
/// Updates build a new snapshot and swap it in whole, so a pass that holds a
/// snapshot never sees a half-applied update.
#[derive(Debug, Default)]
pub struct LandmarkStore {
    current: RwLock<Arc<LandmarkSnapshot>>,
}

impl LandmarkStore {
    pub fn new() -> LandmarkStore {
        LandmarkStore::default()
    }

    pub fn snapshot(&self) -> Arc<LandmarkSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replaces the map and its full landmark subset.
    pub fn on_map(&self, map: VectorMap) {
        let all = map.all_landmarks();
        log::info!("map received with {} traffic mirrors", all.len());
        let mut current = self.write();
        *current = Arc::new(LandmarkSnapshot {
            map: Some(Arc::new(map)),
            all: Some(Arc::new(all)),
            route: current.route.clone(),
        });
    }

    /// Replaces the route subset and returns the snapshot it was installed in.
    ///
    /// The subset is built from the map of that same snapshot. Leaves the store
    /// untouched on error.
    pub fn on_route(&self, route: &Route) -> Result<Arc<LandmarkSnapshot>, MapError> {
        let mut current = self.write();
        let map = current.map.as_ref().ok_or(MapError::MapNotReceived)?;
        let subset = map.route_landmarks(route)?;
        log::info!("route received with {} traffic mirrors", subset.len());
        let next = Arc::new(LandmarkSnapshot {
            route: Some(Arc::new(subset)),
            ..LandmarkSnapshot::clone(&current)
        });
        *current = Arc::clone(&next);
        Ok(next)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<LandmarkSnapshot>> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
