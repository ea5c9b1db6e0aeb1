//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level hex map configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid and chunk dimensions.
    pub map: MapConfig,
    /// Geometry tunables consumed by the triangulator.
    pub terrain: TerrainConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Grid dimensions, expressed in chunks of cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Number of chunks along the X (column) axis.
    pub chunk_count_x: u32,
    /// Number of chunks along the Z (row) axis.
    pub chunk_count_z: u32,
    /// Cells per chunk along X.
    pub chunk_size_x: u32,
    /// Cells per chunk along Z.
    pub chunk_size_z: u32,
}

/// Geometry and noise settings for mesh synthesis.
///
/// Every value here is read once when the immutable metrics object is built;
/// changing the file later requires rebuilding the grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// World height of one elevation level.
    pub elevation_step: f32,
    /// Flat treads per slope. Terrace steps are `2 * terraces_per_slope + 1`.
    pub terraces_per_slope: u32,
    /// Fraction of the hexagon radius covered by the solid (unblended) region.
    pub solid_factor: f32,
    /// Fraction of the hexagon radius covered by open water before the shore blend.
    pub water_factor: f32,
    /// Horizontal displacement amplitude applied to every vertex.
    pub cell_perturb_strength: f32,
    /// Vertical displacement amplitude applied to cell centers.
    pub elevation_perturb_strength: f32,
    /// River bed depth in elevation levels, relative to the cell floor.
    pub stream_bed_elevation_offset: f32,
    /// River and lake surface offset in elevation levels.
    pub water_elevation_offset: f32,
    /// World-to-noise coordinate scale.
    pub noise_scale: f64,
    /// Seed of the perturbation noise.
    pub noise_seed: u32,
    /// RGBA color per terrain type index.
    pub colors: Vec<[f32; 4]>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            chunk_count_x: 4,
            chunk_count_z: 3,
            chunk_size_x: 5,
            chunk_size_z: 5,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            elevation_step: 3.0,
            terraces_per_slope: 2,
            solid_factor: 0.8,
            water_factor: 0.6,
            cell_perturb_strength: 4.0,
            elevation_perturb_strength: 1.5,
            stream_bed_elevation_offset: -1.75,
            water_elevation_offset: -0.5,
            noise_scale: 0.003,
            noise_seed: 0,
            colors: vec![
                [0.91, 0.84, 0.55, 1.0], // sand
                [0.42, 0.67, 0.27, 1.0], // grass
                [0.45, 0.35, 0.25, 1.0], // mud
                [0.55, 0.55, 0.55, 1.0], // stone
                [0.95, 0.95, 0.98, 1.0], // snow
            ],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Total cell columns (`chunk_count_x * chunk_size_x`).
    pub fn cell_count_x(&self) -> u32 {
        self.map.chunk_count_x * self.map.chunk_size_x
    }

    /// Total cell rows (`chunk_count_z * chunk_size_z`).
    pub fn cell_count_z(&self) -> u32 {
        self.map.chunk_count_z * self.map.chunk_size_z
    }

    /// Rejects values that parse but would produce a degenerate grid or mesh.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::InvalidValue { field, reason });

        if self.map.chunk_count_x == 0 || self.map.chunk_count_z == 0 {
            return invalid("map.chunk_count", "grid needs at least one chunk per axis");
        }
        if self.map.chunk_size_x == 0 || self.map.chunk_size_z == 0 {
            return invalid("map.chunk_size", "chunks need at least one cell per axis");
        }
        if self.terrain.terraces_per_slope == 0 {
            return invalid("terrain.terraces_per_slope", "must be at least 1");
        }
        if !(0.0..1.0).contains(&self.terrain.solid_factor) || self.terrain.solid_factor == 0.0 {
            return invalid("terrain.solid_factor", "must be in (0, 1)");
        }
        if !(0.0..1.0).contains(&self.terrain.water_factor) || self.terrain.water_factor == 0.0 {
            return invalid("terrain.water_factor", "must be in (0, 1)");
        }
        if self.terrain.elevation_step <= 0.0 {
            return invalid("terrain.elevation_step", "must be positive");
        }
        if self.terrain.colors.is_empty() {
            return invalid("terrain.colors", "palette needs at least one color");
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    ///
    /// Terrain and map sections only take effect after the grid is rebuilt.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("chunk_count_x: 4"));
        assert!(ron_str.contains("terraces_per_slope: 2"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(map: (chunk_count_x: 2))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.map.chunk_count_x, 2);
        assert_eq!(config.map.chunk_size_x, 5);
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_cell_counts_follow_chunk_layout() {
        let config = Config::default();
        assert_eq!(config.cell_count_x(), 20);
        assert_eq!(config.cell_count_z(), 15);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_terraces_rejected() {
        let mut config = Config::default();
        config.terrain.terraces_per_slope = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "terrain.terraces_per_slope",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_palette_rejected() {
        let mut config = Config::default();
        config.terrain.colors.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.map.chunk_count_x = 8;
        config.terrain.noise_seed = 42;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.terrain.elevation_step = 5.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().terrain.elevation_step, 5.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
