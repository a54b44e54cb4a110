//! Artifact sink abstraction and backends
//!
//! - [`traits`] - the [`ArtifactSink`] seam consumed by the reconciler
//! - [`filesystem`] - directory-backed sink (production)
//! - [`memory`] - map-backed sink with failure injection (tests)

pub mod filesystem;
pub mod memory;
pub mod traits;

pub use filesystem::FilesystemSink;
pub use memory::MemorySink;
pub use traits::ArtifactSink;
