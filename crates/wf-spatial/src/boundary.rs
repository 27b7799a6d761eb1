//! Service-area boundary and the campus membership test.

use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};

use wf_core::Coordinate;

use crate::SpatialError;

/// Tri-state answer to "is this position on campus?".
///
/// `Unknown` is not an error: it means no position has been reported yet, and
/// any "use my current position" affordance must stay disabled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Membership {
    Inside,
    Outside,
    Unknown,
}

impl Membership {
    #[inline]
    pub fn is_inside(self) -> bool {
        matches!(self, Membership::Inside)
    }
}

/// The campus boundary: one or more polygons, each with optional holes.
#[derive(Clone, Debug)]
pub struct ServiceArea {
    area: MultiPolygon<f64>,
}

impl ServiceArea {
    /// Simple ring boundary.
    pub fn new(exterior: &[Coordinate]) -> Result<Self, SpatialError> {
        Self::with_holes(exterior, &[])
    }

    /// Boundary with interior rings excluded from the area.
    pub fn with_holes(
        exterior: &[Coordinate],
        holes: &[Vec<Coordinate>],
    ) -> Result<Self, SpatialError> {
        let polygon = polygon(exterior, holes)?;
        Ok(Self { area: MultiPolygon::new(vec![polygon]) })
    }

    /// Add another disjoint part to the boundary.
    pub fn push_part(
        &mut self,
        exterior: &[Coordinate],
        holes: &[Vec<Coordinate>],
    ) -> Result<(), SpatialError> {
        self.area.0.push(polygon(exterior, holes)?);
        Ok(())
    }

    pub fn part_count(&self) -> usize {
        self.area.0.len()
    }

    /// `true` if `pos` lies strictly inside the area (not on an edge, not in
    /// a hole).
    pub fn contains(&self, pos: Coordinate) -> bool {
        self.area.contains(&Point::new(pos.lon, pos.lat))
    }

    /// Campus membership of an optional live position.
    pub fn membership(&self, pos: Option<Coordinate>) -> Membership {
        match pos {
            None => Membership::Unknown,
            Some(p) if self.contains(p) => Membership::Inside,
            Some(_) => Membership::Outside,
        }
    }
}

fn ring(coords: &[Coordinate]) -> Result<LineString<f64>, SpatialError> {
    let mut distinct: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for &c in coords {
        if !c.is_valid() {
            return Err(SpatialError::InvalidBoundary(format!("invalid vertex {c}")));
        }
        if distinct.last().is_none_or(|last| last.key() != c.key()) {
            distinct.push(c);
        }
    }
    // A closed ring repeats its first vertex; ignore that for the count.
    if distinct.len() > 1 && distinct[0].key() == distinct[distinct.len() - 1].key() {
        distinct.pop();
    }
    if distinct.len() < 3 {
        return Err(SpatialError::InvalidBoundary(format!(
            "ring needs at least 3 distinct vertices, got {}",
            distinct.len()
        )));
    }
    // geo closes the ring itself.
    Ok(LineString::new(
        distinct.iter().map(|c| Coord { x: c.lon, y: c.lat }).collect(),
    ))
}

fn polygon(exterior: &[Coordinate], holes: &[Vec<Coordinate>]) -> Result<Polygon<f64>, SpatialError> {
    let interiors = holes.iter().map(|h| ring(h)).collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(ring(exterior)?, interiors))
}
