//! Vector-map records and extraction of traffic mirror landmarks.
//!
//! The map follows the lanelet layout: lanelets reference regulatory
//! elements, and a `traffic_mirror` regulatory element references the line
//! strings that outline each mirror. Attributes are kept as text, the way the
//! map format stores them.

use std::collections::{BTreeMap, HashMap};

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::landmark::{Landmark, LandmarkSet};

/// Regulatory element subtype that carries mirror line strings.
pub const TRAFFIC_MIRROR_SUBTYPE: &str = "traffic_mirror";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("route references lanelet {0} which is not in the map")]
    UnknownLanelet(i64),
    #[error("cannot select route landmarks before a map is received")]
    MapNotReceived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLineString {
    pub id: i64,
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl MapLineString {
    /// Interprets the line string as a mirror landmark, or `None` if it does not fit.
    pub fn to_landmark(&self) -> Option<Landmark> {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => (first, last),
            _ => {
                log::debug!("line string {} has fewer than two points", self.id);
                return None;
            }
        };
        let height = match self.attributes.get("height") {
            Some(text) => match text.trim().parse::<f64>() {
                Ok(h) => h,
                Err(_) => {
                    log::debug!("line string {} has unparsable height `{}`", self.id, text);
                    return None;
                }
            },
            None => 0.0,
        };
        let subtype = self.attributes.get("subtype").cloned();
        Landmark::new(
            self.id,
            na::Point3::from(*first),
            na::Point3::from(*last),
            height,
            subtype,
        )
        .map_err(|e| log::debug!("skipping line string {}: {}", self.id, e))
        .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRegulatoryElement {
    pub id: i64,
    pub subtype: String,
    /// Line strings referenced by the element (`traffic_mirrors` parameter).
    #[serde(default)]
    pub refers: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLanelet {
    pub id: i64,
    #[serde(default)]
    pub regulatory_elements: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorMap {
    #[serde(default)]
    pub lanelets: Vec<MapLanelet>,
    #[serde(default)]
    pub regulatory_elements: Vec<MapRegulatoryElement>,
    #[serde(default)]
    pub line_strings: Vec<MapLineString>,
}

impl VectorMap {
    /// Mirrors referenced from any lanelet of the map.
    pub fn all_landmarks(&self) -> LandmarkSet {
        self.collect_landmarks(self.lanelets.iter())
    }

    /// Mirrors referenced from the lanelets along `route`.
    pub fn route_landmarks(&self, route: &Route) -> Result<LandmarkSet, MapError> {
        let by_id: HashMap<i64, &MapLanelet> = self.lanelets.iter().map(|l| (l.id, l)).collect();
        let lanelets = route
            .lanelet_ids()
            .map(|id| by_id.get(&id).copied().ok_or(MapError::UnknownLanelet(id)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.collect_landmarks(lanelets.into_iter()))
    }

    fn collect_landmarks<'a>(&'a self, lanelets: impl Iterator<Item = &'a MapLanelet>) -> LandmarkSet {
        let elements: HashMap<i64, &MapRegulatoryElement> = self
            .regulatory_elements
            .iter()
            .filter(|e| e.subtype == TRAFFIC_MIRROR_SUBTYPE)
            .map(|e| (e.id, e))
            .collect();
        let line_strings: HashMap<i64, &MapLineString> =
            self.line_strings.iter().map(|ls| (ls.id, ls)).collect();

        let mut set = LandmarkSet::new();
        for lanelet in lanelets {
            for element in lanelet.regulatory_elements.iter().filter_map(|id| elements.get(id)) {
                for ls_id in &element.refers {
                    match line_strings.get(ls_id) {
                        Some(ls) => {
                            if let Some(landmark) = ls.to_landmark() {
                                set.insert(landmark);
                            }
                        }
                        None => log::debug!(
                            "regulatory element {} refers to missing line string {}",
                            element.id,
                            ls_id
                        ),
                    }
                }
            }
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub primitives: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub segments: Vec<RouteSegment>,
}

impl Route {
    pub fn lanelet_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.segments.iter().flat_map(|s| s.primitives.iter().copied())
    }
}
