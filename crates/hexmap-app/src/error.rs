//! Top-level error type of the `hexmap` binary.

use std::path::PathBuf;

use hexmap_config::ConfigError;
use hexmap_grid::MapSerError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A map file could not be decoded or encoded.
    #[error("map file {}: {source}", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: MapSerError,
    },

    /// Opening, creating or flushing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode stats: {0}")]
    Stats(#[from] serde_json::Error),
}

impl AppError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn map(path: &std::path::Path) -> impl FnOnce(MapSerError) -> Self + '_ {
        move |source| Self::Map {
            path: path.to_path_buf(),
            source,
        }
    }
}
