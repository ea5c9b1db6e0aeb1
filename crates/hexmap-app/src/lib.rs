//! Host side of the hex map tools: directory resolution, editing sessions
//! and the scripted demo used by the `hexmap` binary.

pub mod demo;
pub mod error;
pub mod platform;
pub mod session;

pub use error::AppError;
pub use platform::{PlatformDirs, PlatformError};
pub use session::{BufferStats, HexMapSession, MeshStats};
