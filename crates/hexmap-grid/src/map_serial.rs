//! Binary save and load of the editable cell state.
//!
//! ## Binary Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Format version (`u32`, little-endian, currently 0) |
//! | 4 | N×5 | One record per cell in row-major order |
//!
//! Each record:
//!
//! | Byte | Field |
//! |------|-------|
//! | 0 | Terrain type |
//! | 1 | Elevation plus [`ELEVATION_BIAS`] |
//! | 2 | Incoming river: 0 for none, else `128 + direction` |
//! | 3 | Outgoing river: same encoding |
//! | 4 | Road mask: bit `i` set for a road toward direction `i` |
//!
//! Water level is not stored and survives a load unchanged.
//!
//! Loading rejects any stream whose rivers and roads could not have been
//! produced by the mutators: uphill rivers, roads sharing an edge with a
//! river and roads across more than one elevation level.

use std::io::{Read, Write};

use hexmap_coords::HexDirection;

use crate::grid::HexGrid;

/// Current format version.
pub const MAP_FORMAT_VERSION: u32 = 0;

/// Added to elevations before they are stored as a byte, so the storable
/// range is `-127..=128`.
pub const ELEVATION_BIAS: i32 = 127;

const RECORD_LEN: usize = 5;
const RIVER_FLAG: u8 = 0x80;

/// Errors that can occur while saving or loading a map.
#[derive(Debug, thiserror::Error)]
pub enum MapSerError {
    /// The stream was written by an unknown format version.
    #[error("unsupported map format version: {0}")]
    UnsupportedVersion(u32),
    /// Reading or writing failed, including a truncated stream.
    #[error("map I/O failed")]
    Io(#[from] std::io::Error),
    /// A cell elevation cannot be stored in one byte.
    #[error("cell {cell} elevation {elevation} is outside -127..=128")]
    ElevationOutOfRange {
        /// Arena index of the offending cell.
        cell: usize,
        /// Elevation that did not fit.
        elevation: i32,
    },
    /// A river byte is neither 0 nor a flagged direction.
    #[error("cell {cell} has invalid river byte {value:#04x}")]
    InvalidRiver {
        /// Arena index of the offending cell.
        cell: usize,
        /// The raw byte.
        value: u8,
    },
    /// A river or road points past the grid border.
    #[error("cell {cell} has a river or road leaving the grid toward {direction:?}")]
    DanglingEdge {
        /// Arena index of the offending cell.
        cell: usize,
        /// Direction of the missing neighbor.
        direction: HexDirection,
    },
    /// The two sides of an edge disagree.
    #[error("cell {cell} edge {direction:?} is not mirrored by its neighbor")]
    UnmirroredEdge {
        /// Arena index of the offending cell.
        cell: usize,
        /// Edge direction.
        direction: HexDirection,
    },
    /// An edge carries a river or road the editing rules never allow.
    #[error("cell {cell} edge {direction:?} breaks a river or road rule")]
    InvariantViolation {
        /// Arena index of the offending cell.
        cell: usize,
        /// Edge direction.
        direction: HexDirection,
    },
}

/// Decoded cell record, kept until the whole stream validates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRecord {
    terrain_type: u8,
    elevation: u8,
    incoming_river: Option<HexDirection>,
    outgoing_river: Option<HexDirection>,
    roads: u8,
}

impl CellRecord {
    fn has_road(&self, direction: HexDirection) -> bool {
        self.roads & (1 << direction.index()) != 0
    }

    fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }
}

fn encode_river(river: Option<HexDirection>) -> u8 {
    river.map_or(0, |d| RIVER_FLAG | d as u8)
}

fn decode_river(cell: usize, value: u8) -> Result<Option<HexDirection>, MapSerError> {
    if value == 0 {
        return Ok(None);
    }
    if value & RIVER_FLAG == 0 {
        return Err(MapSerError::InvalidRiver { cell, value });
    }
    HexDirection::from_u8(value & !RIVER_FLAG)
        .map(Some)
        .ok_or(MapSerError::InvalidRiver { cell, value })
}

impl HexGrid {
    /// Write every cell's terrain, elevation, rivers and roads.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), MapSerError> {
        let mut buf = Vec::with_capacity(4 + self.cells.len() * RECORD_LEN);
        buf.extend_from_slice(&MAP_FORMAT_VERSION.to_le_bytes());

        for (i, cell) in self.cells.iter().enumerate() {
            let elevation = cell
                .elevation
                .checked_add(ELEVATION_BIAS)
                .and_then(|e| u8::try_from(e).ok())
                .ok_or(MapSerError::ElevationOutOfRange {
                    cell: i,
                    elevation: cell.elevation,
                })?;
            let roads = HexDirection::ALL
                .iter()
                .filter(|d| cell.has_road_through_edge(**d))
                .fold(0u8, |mask, d| mask | (1 << d.index()));

            buf.push(cell.terrain_type);
            buf.push(elevation);
            buf.push(encode_river(cell.incoming_river));
            buf.push(encode_river(cell.outgoing_river));
            buf.push(roads);
        }

        writer.write_all(&buf)?;
        tracing::debug!(cells = self.cells.len(), bytes = buf.len(), "map saved");
        Ok(())
    }

    /// Replace every cell's saved state from `reader` and dirty all chunks.
    ///
    /// The whole stream is decoded and validated before any cell changes, so
    /// on error the grid is untouched.
    pub fn load<R: Read>(&mut self, reader: &mut R) -> Result<(), MapSerError> {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;
        let version = u32::from_le_bytes(header);
        if version != MAP_FORMAT_VERSION {
            tracing::warn!(version, "refusing to load map with unknown format version");
            return Err(MapSerError::UnsupportedVersion(version));
        }

        let mut data = vec![0u8; self.cells.len() * RECORD_LEN];
        reader.read_exact(&mut data)?;

        let records = data
            .chunks_exact(RECORD_LEN)
            .enumerate()
            .map(|(i, b)| {
                Ok(CellRecord {
                    terrain_type: b[0],
                    elevation: b[1],
                    incoming_river: decode_river(i, b[2])?,
                    outgoing_river: decode_river(i, b[3])?,
                    roads: b[4],
                })
            })
            .collect::<Result<Vec<_>, MapSerError>>()?;

        self.validate_records(&records)?;

        for (i, record) in records.iter().enumerate() {
            let cell = &mut self.cells[i];
            cell.terrain_type = record.terrain_type;
            cell.elevation = i32::from(record.elevation) - ELEVATION_BIAS;
            cell.incoming_river = record.incoming_river;
            cell.outgoing_river = record.outgoing_river;
            for d in HexDirection::ALL {
                cell.roads[d.index()] = record.has_road(d);
            }
            self.refresh_position(i);
        }
        self.mark_all_dirty();

        tracing::debug!(cells = records.len(), "map loaded");
        Ok(())
    }

    /// Every referenced edge must exist, be mirrored by the neighbor's record
    /// and satisfy the river and road rules.
    fn validate_records(&self, records: &[CellRecord]) -> Result<(), MapSerError> {
        for (i, record) in records.iter().enumerate() {
            for d in HexDirection::ALL {
                if !record.has_road(d) && !record.has_river_through_edge(d) {
                    continue;
                }
                let Some(n) = self.cells[i].neighbor(d) else {
                    return Err(MapSerError::DanglingEdge {
                        cell: i,
                        direction: d,
                    });
                };
                let other = &records[n];
                let back = d.opposite();
                let mirrored = record.has_road(d) == other.has_road(back)
                    && (record.outgoing_river == Some(d)) == (other.incoming_river == Some(back))
                    && (record.incoming_river == Some(d)) == (other.outgoing_river == Some(back));
                if !mirrored {
                    return Err(MapSerError::UnmirroredEdge {
                        cell: i,
                        direction: d,
                    });
                }

                // Stored elevations share one bias, so the bytes compare directly.
                let uphill = record.outgoing_river == Some(d) && record.elevation < other.elevation;
                let doubled = record.incoming_river == Some(d) && record.outgoing_river == Some(d);
                let bad_road = record.has_road(d)
                    && (record.has_river_through_edge(d)
                        || record.elevation.abs_diff(other.elevation) > 1);
                if uphill || doubled || bad_road {
                    tracing::warn!(cell = i, direction = ?d, "map breaks river or road rules");
                    return Err(MapSerError::InvariantViolation {
                        cell: i,
                        direction: d,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use hexmap_config::MapConfig;
    use hexmap_coords::HexCoordinates;
    use hexmap_metrics::HexMetrics;

    use super::*;

    fn grid() -> HexGrid {
        let map = MapConfig {
            chunk_count_x: 2,
            chunk_count_z: 1,
            chunk_size_x: 3,
            chunk_size_z: 3,
        };
        HexGrid::new(&map, Arc::new(HexMetrics::default()))
    }

    fn at(g: &HexGrid, col: i32, row: i32) -> usize {
        g.cell_at(HexCoordinates::from_offset(col, row)).unwrap()
    }

    fn edited_grid() -> HexGrid {
        let mut g = grid();
        let a = at(&g, 1, 1);
        let b = at(&g, 2, 1);
        g.set_elevation(a, 1);
        g.set_elevation(b, 1);
        g.set_terrain_type(a, 3);
        g.set_outgoing_river(a, HexDirection::E);
        g.add_road(a, HexDirection::NE);
        g.add_road(b, HexDirection::E);
        g
    }

    fn saved(g: &HexGrid) -> Vec<u8> {
        let mut bytes = Vec::new();
        g.save(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_layout() {
        let g = edited_grid();
        let bytes = saved(&g);
        assert_eq!(bytes.len(), 4 + 18 * RECORD_LEN);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 0]);

        let a = at(&g, 1, 1);
        let rec = &bytes[4 + a * RECORD_LEN..4 + (a + 1) * RECORD_LEN];
        assert_eq!(rec[0], 3);
        assert_eq!(rec[1], 1 + ELEVATION_BIAS as u8);
        assert_eq!(rec[2], 0);
        assert_eq!(rec[3], 128 + HexDirection::E as u8);
        assert_eq!(rec[4], 1 << HexDirection::NE.index());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let original = edited_grid();
        let bytes = saved(&original);

        let mut loaded = grid();
        loaded.take_dirty_chunks();
        loaded.load(&mut Cursor::new(&bytes)).unwrap();

        for (a, b) in original.cells().iter().zip(loaded.cells()) {
            assert_eq!(a.terrain_type(), b.terrain_type());
            assert_eq!(a.elevation(), b.elevation());
            assert_eq!(a.incoming_river(), b.incoming_river());
            assert_eq!(a.outgoing_river(), b.outgoing_river());
            assert_eq!(a.roads(), b.roads());
            assert_eq!(a.position(), b.position());
        }
        assert_eq!(loaded.dirty_chunk_count(), 2);
    }

    #[test]
    fn test_load_keeps_water_level() {
        let bytes = saved(&edited_grid());
        let mut g = grid();
        g.set_water_level(0, 4);
        g.load(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(g.cell(0).water_level(), 4);
    }

    #[test]
    fn test_unknown_version_leaves_grid_intact() {
        let mut bytes = saved(&edited_grid());
        bytes[0] = 7;
        let mut g = grid();
        let before = g.cells().to_vec();
        let err = g.load(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, MapSerError::UnsupportedVersion(7)));
        assert_eq!(g.cells(), &before[..]);
    }

    #[test]
    fn test_truncated_stream_is_io_error() {
        let bytes = saved(&edited_grid());
        let mut g = grid();
        let before = g.cells().to_vec();
        let err = g.load(&mut Cursor::new(&bytes[..bytes.len() - 3])).unwrap_err();
        match err {
            MapSerError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("expected Io, got {other:?}"),
        }
        assert_eq!(g.cells(), &before[..]);
    }

    #[test]
    fn test_negative_elevation_roundtrip() {
        let mut g = grid();
        let a = at(&g, 1, 1);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        g.set_elevation(a, -1);
        g.set_elevation(b, -2);
        g.set_outgoing_river(a, HexDirection::E);
        g.add_road(a, HexDirection::W);
        let bytes = saved(&g);

        let mut loaded = grid();
        loaded.load(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(loaded.cell(a).elevation(), -1);
        assert_eq!(loaded.cell(b).elevation(), -2);
        assert_eq!(loaded.cell(a).outgoing_river(), Some(HexDirection::E));
        assert!(loaded.cell(a).has_road_through_edge(HexDirection::W));
        assert_eq!(loaded.cell(a).position(), g.cell(a).position());
    }

    #[test]
    fn test_unstorable_elevation_cannot_be_saved() {
        let mut g = grid();
        g.set_elevation(4, -128);
        let err = g.save(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            MapSerError::ElevationOutOfRange {
                cell: 4,
                elevation: -128
            }
        ));

        g.set_elevation(4, 128);
        assert!(g.save(&mut Vec::new()).is_ok());
        g.set_elevation(4, 129);
        assert!(g.save(&mut Vec::new()).is_err());
    }

    /// Mutable view of the stored record of `cell`.
    fn record(bytes: &mut [u8], cell: usize) -> &mut [u8] {
        &mut bytes[4 + cell * RECORD_LEN..4 + (cell + 1) * RECORD_LEN]
    }

    /// Flat map bytes with a river flowing from cell 0 east into cell 1.
    fn river_bytes() -> Vec<u8> {
        let mut bytes = saved(&grid());
        record(&mut bytes, 0)[3] = RIVER_FLAG | HexDirection::E as u8;
        record(&mut bytes, 1)[2] = RIVER_FLAG | HexDirection::W as u8;
        bytes
    }

    fn assert_rule_broken_at_cell_0_east(bytes: &[u8]) {
        let mut g = grid();
        let before = g.cells().to_vec();
        let err = g.load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(
            matches!(
                err,
                MapSerError::InvariantViolation {
                    cell: 0,
                    direction: HexDirection::E
                }
            ),
            "unexpected {err:?}"
        );
        assert_eq!(g.cells(), &before[..]);
    }

    #[test]
    fn test_downhill_river_loads() {
        let mut bytes = river_bytes();
        record(&mut bytes, 0)[1] += 3;
        let mut g = grid();
        g.load(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(g.cell(0).elevation(), 3);
        assert_eq!(g.cell(0).outgoing_river(), Some(HexDirection::E));
    }

    #[test]
    fn test_uphill_river_rejected() {
        let mut bytes = river_bytes();
        record(&mut bytes, 1)[1] += 5;
        assert_rule_broken_at_cell_0_east(&bytes);
    }

    #[test]
    fn test_road_on_river_edge_rejected() {
        let mut bytes = river_bytes();
        record(&mut bytes, 0)[4] = 1 << HexDirection::E.index();
        record(&mut bytes, 1)[4] = 1 << HexDirection::W.index();
        assert_rule_broken_at_cell_0_east(&bytes);
    }

    #[test]
    fn test_road_across_cliff_rejected() {
        let mut bytes = saved(&grid());
        record(&mut bytes, 0)[4] = 1 << HexDirection::E.index();
        record(&mut bytes, 1)[4] = 1 << HexDirection::W.index();
        record(&mut bytes, 1)[1] += 2;
        assert_rule_broken_at_cell_0_east(&bytes);

        // One level is a slope, which roads may climb.
        record(&mut bytes, 1)[1] -= 1;
        let mut g = grid();
        g.load(&mut Cursor::new(&bytes)).unwrap();
        assert!(g.cell(0).has_road_through_edge(HexDirection::E));
    }

    #[test]
    fn test_invalid_river_byte_rejected() {
        let mut bytes = saved(&grid());
        bytes[4 + 2] = 0x86;
        let mut g = grid();
        let err = g.load(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, MapSerError::InvalidRiver { cell: 0, value: 0x86 }));

        bytes[4 + 2] = 0x03;
        let err = g.load(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, MapSerError::InvalidRiver { .. }));
    }

    #[test]
    fn test_off_grid_road_rejected() {
        let mut bytes = saved(&grid());
        // Cell 0 has no western neighbor.
        bytes[4 + 4] = 1 << HexDirection::W.index();
        let mut g = grid();
        let err = g.load(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            MapSerError::DanglingEdge {
                cell: 0,
                direction: HexDirection::W
            }
        ));
    }

    #[test]
    fn test_one_sided_road_rejected() {
        let mut bytes = saved(&grid());
        bytes[4 + 4] = 1 << HexDirection::E.index();
        let mut g = grid();
        assert!(matches!(
            g.load(&mut Cursor::new(&bytes)).unwrap_err(),
            MapSerError::UnmirroredEdge { cell: 0, .. }
        ));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.map");
        let original = edited_grid();
        {
            let mut file = std::fs::File::create(&path).unwrap();
            original.save(&mut file).unwrap();
        }
        let mut g = grid();
        let mut file = std::fs::File::open(&path).unwrap();
        g.load(&mut file).unwrap();
        assert_eq!(g.cell(at(&g, 1, 1)).terrain_type(), 3);
    }
}
