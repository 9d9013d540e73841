use std::collections::BTreeMap;

use nalgebra as na;

use crate::util::normalize_radian;

/// Subtype whose line strings are painted markings, not mirrors.
pub const SOLID_SUBTYPE: &str = "solid";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("landmark {id} has non-finite geometry")]
    NonFinite { id: i64 },
    #[error("landmark {id} endpoints coincide")]
    DegenerateSegment { id: i64 },
}

/// A mirror surface referenced by the map.
///
/// `first` is the top-left reference at the bottom of the surface (raised by
/// `height` to get the top edge), `last` the bottom-right reference. The
/// surface plane is vertical.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    id: i64,
    first: na::Point3<f64>,
    last: na::Point3<f64>,
    height: f64,
    subtype: Option<String>,
}

impl Landmark {
    pub fn new(
        id: i64,
        first: na::Point3<f64>,
        last: na::Point3<f64>,
        height: f64,
        subtype: Option<String>,
    ) -> Result<Landmark, LandmarkError> {
        let finite = first.iter().chain(last.iter()).all(|v| v.is_finite()) && height.is_finite();
        if !finite {
            return Err(LandmarkError::NonFinite { id });
        }
        if first == last {
            return Err(LandmarkError::DegenerateSegment { id });
        }
        Ok(Landmark {
            id,
            first,
            last,
            height,
            subtype,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn first(&self) -> &na::Point3<f64> {
        &self.first
    }

    pub fn last(&self) -> &na::Point3<f64> {
        &self.last
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Mirrors without a subtype, or with the solid subtype, are never targets.
    pub fn is_actionable(&self) -> bool {
        matches!(self.subtype(), Some(s) if s != SOLID_SUBTYPE)
    }

    pub fn top_left(&self) -> na::Point3<f64> {
        na::Point3::new(self.first.x, self.first.y, self.first.z + self.height)
    }

    pub fn bottom_right(&self) -> na::Point3<f64> {
        self.last
    }

    pub fn center(&self) -> na::Point3<f64> {
        na::center(&self.top_left(), &self.bottom_right())
    }

    /// Heading of the surface normal in the map plane, in `(-π, π]`.
    pub fn yaw(&self) -> f64 {
        let dx = self.last.x - self.first.x;
        let dy = self.last.y - self.first.y;
        normalize_radian(dy.atan2(dx) + std::f64::consts::FRAC_PI_2)
    }
}

/// Landmarks keyed by their stable id. Iterates in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    landmarks: BTreeMap<i64, Landmark>,
}

impl LandmarkSet {
    pub fn new() -> LandmarkSet {
        LandmarkSet::default()
    }

    /// Inserts `landmark`, returning the record it replaced, if any.
    pub fn insert(&mut self, landmark: Landmark) -> Option<Landmark> {
        self.landmarks.insert(landmark.id(), landmark)
    }

    pub fn get(&self, id: i64) -> Option<&Landmark> {
        self.landmarks.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.values()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        let mut set = LandmarkSet::new();
        for landmark in iter {
            set.insert(landmark);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::collections::btree_map::Values<'a, i64, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.values()
    }
}
