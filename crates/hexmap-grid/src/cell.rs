//! Per-cell terrain state and the queries derived from it.

use glam::{Vec3, Vec4};
use hexmap_coords::{HexCoordinates, HexDirection};
use hexmap_metrics::HexMetrics;

/// One hexagon of the map.
///
/// Fields are only writable through [`crate::HexGrid`] mutators so that the
/// mirrored neighbor state stays consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct HexCell {
    pub(crate) coordinates: HexCoordinates,
    pub(crate) position: Vec3,
    pub(crate) elevation: i32,
    pub(crate) water_level: i32,
    pub(crate) terrain_type: u8,
    pub(crate) neighbors: [Option<usize>; 6],
    pub(crate) incoming_river: Option<HexDirection>,
    pub(crate) outgoing_river: Option<HexDirection>,
    pub(crate) roads: [bool; 6],
    pub(crate) chunk: usize,
}

impl HexCell {
    pub(crate) fn new(coordinates: HexCoordinates, position: Vec3, chunk: usize) -> Self {
        Self {
            coordinates,
            position,
            elevation: 0,
            water_level: 0,
            terrain_type: 0,
            neighbors: [None; 6],
            incoming_river: None,
            outgoing_river: None,
            roads: [false; 6],
            chunk,
        }
    }

    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    /// World position of the center, including vertical perturbation.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn terrain_type(&self) -> u8 {
        self.terrain_type
    }

    /// Index of the chunk this cell belongs to.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Arena index of the neighbor across `direction`, `None` at the border.
    pub fn neighbor(&self, direction: HexDirection) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    // --- Rivers ---

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    pub fn has_incoming_river(&self) -> bool {
        self.incoming_river.is_some()
    }

    pub fn has_outgoing_river(&self) -> bool {
        self.outgoing_river.is_some()
    }

    pub fn has_river(&self) -> bool {
        self.has_incoming_river() || self.has_outgoing_river()
    }

    /// `true` when exactly one river edge exists: a source or a sink.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river() != self.has_outgoing_river()
    }

    /// The single river edge of a source or sink cell.
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        self.incoming_river.or(self.outgoing_river)
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    // --- Roads ---

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&r| r)
    }

    /// Road flags indexed by direction.
    pub fn roads(&self) -> [bool; 6] {
        self.roads
    }

    // --- Water ---

    /// Submerged when the water level is above the terrain.
    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    /// Height of the river channel floor.
    pub fn stream_bed_y(&self, metrics: &HexMetrics) -> f32 {
        (self.elevation as f32 + metrics.stream_bed_elevation_offset) * metrics.elevation_step
    }

    /// Height of a river's surface inside this cell.
    pub fn river_surface_y(&self, metrics: &HexMetrics) -> f32 {
        (self.elevation as f32 + metrics.water_elevation_offset) * metrics.elevation_step
    }

    /// Height of standing water covering this cell.
    pub fn water_surface_y(&self, metrics: &HexMetrics) -> f32 {
        (self.water_level as f32 + metrics.water_elevation_offset) * metrics.elevation_step
    }

    pub fn color(&self, metrics: &HexMetrics) -> Vec4 {
        metrics.terrain_color(self.terrain_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> HexCell {
        HexCell::new(HexCoordinates::new(0, 0), Vec3::ZERO, 0)
    }

    #[test]
    fn test_new_cell_is_dry_and_empty() {
        let c = cell();
        assert!(!c.has_river());
        assert!(!c.has_roads());
        assert!(!c.is_underwater());
        assert!(c.neighbors.iter().all(Option::is_none));
    }

    #[test]
    fn test_river_begin_or_end() {
        let mut c = cell();
        c.incoming_river = Some(HexDirection::W);
        assert!(c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), Some(HexDirection::W));

        c.outgoing_river = Some(HexDirection::E);
        assert!(c.has_river());
        assert!(!c.has_river_begin_or_end());
        assert!(c.has_river_through_edge(HexDirection::E));
        assert!(c.has_river_through_edge(HexDirection::W));
        assert!(!c.has_river_through_edge(HexDirection::NE));

        c.incoming_river = None;
        assert_eq!(c.river_begin_or_end_direction(), Some(HexDirection::E));
    }

    #[test]
    fn test_underwater_requires_strictly_higher_water() {
        let mut c = cell();
        c.elevation = 2;
        c.water_level = 2;
        assert!(!c.is_underwater());
        c.water_level = 3;
        assert!(c.is_underwater());
    }

    #[test]
    fn test_surface_heights() {
        let m = HexMetrics::default();
        let mut c = cell();
        c.elevation = 2;
        c.water_level = 4;
        assert_eq!(c.stream_bed_y(&m), (2.0 - 1.75) * 3.0);
        assert_eq!(c.river_surface_y(&m), (2.0 - 0.5) * 3.0);
        assert_eq!(c.water_surface_y(&m), (4.0 - 0.5) * 3.0);
        assert!(c.stream_bed_y(&m) < c.river_surface_y(&m));
    }

    #[test]
    fn test_roads_query() {
        let mut c = cell();
        c.roads[HexDirection::SE.index()] = true;
        assert!(c.has_roads());
        assert!(c.has_road_through_edge(HexDirection::SE));
        assert!(!c.has_road_through_edge(HexDirection::NW));
    }
}
