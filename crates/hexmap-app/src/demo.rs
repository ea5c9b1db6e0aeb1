//! Scripted edit sequence exercising every feature of the triangulator.
//!
//! The script is laid out relative to the map size: a hill in the west, a
//! lake in the east, a river running from the hilltop into the lake and a
//! road north of the river. Strokes are replayed through the brush editor the
//! way pointer input would arrive, one cell center per frame.

use hexmap_coords::HexCoordinates;
use hexmap_grid::{EditSettings, OptionalToggle};

use crate::session::HexMapSession;

/// One brush stroke: the settings held down while moving across `path`.
struct Stroke {
    label: &'static str,
    settings: EditSettings,
    path: Vec<(i32, i32)>,
}

/// Run the demo script. Returns the number of cells the brush landed on.
pub fn run_demo(session: &mut HexMapSession) -> usize {
    let mut edited = 0;
    for stroke in script(session) {
        let mut hits = 0;
        for &(col, row) in &stroke.path {
            let point = session
                .grid()
                .cell_at(HexCoordinates::from_offset(col, row))
                .map(|cell| session.grid().cell(cell).position());
            if session.edit_at(point, &stroke.settings).is_some() {
                hits += 1;
            }
        }
        session.release();
        tracing::debug!(stroke = stroke.label, hits, "demo stroke applied");
        edited += hits;
    }
    edited
}

fn script(session: &HexMapSession) -> Vec<Stroke> {
    let w = session.grid().cell_count_x() as i32;
    let h = session.grid().cell_count_z() as i32;
    let hill = (w / 4, h / 2);
    let lake = (w - 1 - w / 4, h / 2);
    let road_row = (hill.1 + 3).min(h - 1);

    vec![
        Stroke {
            label: "hill",
            settings: EditSettings {
                terrain_type: Some(2),
                elevation: Some(2),
                brush_size: 1,
                ..Default::default()
            },
            path: vec![hill],
        },
        Stroke {
            label: "hilltop",
            settings: EditSettings {
                terrain_type: Some(3),
                elevation: Some(3),
                ..Default::default()
            },
            path: vec![hill],
        },
        Stroke {
            label: "lake",
            settings: EditSettings {
                terrain_type: Some(1),
                water_level: Some(1),
                brush_size: 1,
                ..Default::default()
            },
            path: vec![lake],
        },
        Stroke {
            label: "river",
            settings: EditSettings {
                river_mode: OptionalToggle::Yes,
                ..Default::default()
            },
            path: (hill.0..=lake.0).map(|col| (col, hill.1)).collect(),
        },
        Stroke {
            label: "road",
            settings: EditSettings {
                road_mode: OptionalToggle::Yes,
                ..Default::default()
            },
            path: (0..w).map(|col| (col, road_row)).collect(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use hexmap_config::{Config, MapConfig};

    use super::*;

    #[test]
    fn test_demo_fills_every_buffer_on_default_map() {
        let mut session = HexMapSession::new(&Config::default()).unwrap();
        assert!(run_demo(&mut session) > 0);
        session.tick();

        let stats = session.stats();
        assert!(stats.river_cells > 0);
        assert!(stats.road_cells > 0);
        assert!(stats.underwater_cells > 0);
        for buffer in &stats.buffers {
            assert!(buffer.triangles > 0, "{} is empty", buffer.name);
        }
    }

    #[test]
    fn test_demo_on_tiny_map() {
        let config = Config {
            map: MapConfig {
                chunk_count_x: 1,
                chunk_count_z: 1,
                chunk_size_x: 2,
                chunk_size_z: 2,
            },
            ..Default::default()
        };
        let mut session = HexMapSession::new(&config).unwrap();
        run_demo(&mut session);
        session.tick();
        assert_eq!(session.stats().cells, 4);
    }
}
