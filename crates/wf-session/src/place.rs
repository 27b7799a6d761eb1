//! Static place catalog: named buildings, lots, and points of interest.

use rustc_hash::FxHashMap;

use wf_core::{Coordinate, WfError, WfResult};

// ── LotClass ──────────────────────────────────────────────────────────────────

/// Parking classification of a place.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LotClass {
    /// Not a parking lot.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "no"))]
    None,
    Student,
    Staff,
}

// ── Place ─────────────────────────────────────────────────────────────────────

/// A named, routable destination with one or more entry points.
///
/// Entry points are surveyed onto walk-network vertices; the resolver looks
/// them up exactly and never snaps them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    name: String,
    entry_points: Vec<Coordinate>,

    /// Parking classification.  Student lots feed auto-lot selection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lot: LotClass,

    /// Whether a renderer should emphasise the footprint when this place is
    /// the destination.
    #[cfg_attr(feature = "serde", serde(default = "default_highlightable"))]
    pub highlightable: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub link: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub floor: Option<i32>,
}

#[cfg(feature = "serde")]
fn default_highlightable() -> bool {
    true
}

impl Place {
    /// Create a place with default attributes (not a lot, highlightable).
    ///
    /// # Errors
    ///
    /// [`WfError::EmptyPlace`] if `entry_points` is empty, and
    /// [`WfError::InvalidCoordinate`] if any entry point is out of range.
    pub fn new(name: impl Into<String>, entry_points: Vec<Coordinate>) -> WfResult<Self> {
        let place = Self {
            name: name.into(),
            entry_points,
            lot: LotClass::None,
            highlightable: true,
            link: None,
            floor: None,
        };
        place.validate()?;
        Ok(place)
    }

    pub fn with_lot(mut self, lot: LotClass) -> Self {
        self.lot = lot;
        self
    }

    pub fn with_highlightable(mut self, highlightable: bool) -> Self {
        self.highlightable = highlightable;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Re-check the construction invariants.  Deserialized places bypass
    /// [`new`](Self::new), so the catalog calls this on insert.
    pub fn validate(&self) -> WfResult<()> {
        if self.entry_points.is_empty() {
            return Err(WfError::EmptyPlace(self.name.clone()));
        }
        if let Some(bad) = self.entry_points.iter().find(|c| !c.is_valid()) {
            return Err(WfError::InvalidCoordinate(format!("{bad} in place {:?}", self.name)));
        }
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Never empty.
    #[inline]
    pub fn entry_points(&self) -> &[Coordinate] {
        &self.entry_points
    }

    pub fn external_link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    #[inline]
    pub fn is_student_lot(&self) -> bool {
        self.lot == LotClass::Student
    }
}

// ── PlaceCatalog ──────────────────────────────────────────────────────────────

/// All known places, in insertion order, with an index by exact name.
#[derive(Clone, Debug, Default)]
pub struct PlaceCatalog {
    places:  Vec<Place>,
    by_name: FxHashMap<String, usize>,
}

impl PlaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from an iterator of places.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid place or duplicate name.
    pub fn from_places(places: impl IntoIterator<Item = Place>) -> WfResult<Self> {
        let mut catalog = Self::new();
        for place in places {
            catalog.insert(place)?;
        }
        Ok(catalog)
    }

    /// Add a place.  Names are unique keys.
    pub fn insert(&mut self, place: Place) -> WfResult<()> {
        place.validate()?;
        if self.by_name.contains_key(place.name()) {
            return Err(WfError::Config(format!("duplicate place name {:?}", place.name())));
        }
        self.by_name.insert(place.name.clone(), self.places.len());
        self.places.push(place);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter()
    }

    /// Exact, case-sensitive lookup by name.
    pub fn resolve_by_name(&self, name: &str) -> Option<&Place> {
        self.by_name.get(name).map(|&i| &self.places[i])
    }

    /// Places whose name contains `query`, ignoring case, in catalog order.
    ///
    /// A blank query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Place> + 'a {
        let needle = query.trim().to_lowercase();
        self.places
            .iter()
            .filter(move |p| p.name.to_lowercase().contains(&needle))
    }

    /// Places of one lot class, in catalog order.
    pub fn lots(&self, class: LotClass) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter().filter(move |p| p.lot == class)
    }
}
