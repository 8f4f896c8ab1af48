//! Tabular sources
//!
//! Glob patterns are resolved against a base directory into `ResolvedSource`
//! handles. Each handle picks its decoder from the file extension and decodes
//! into an Arrow-backed `Frame` only when loaded.

mod errors;
mod format;
mod frame;
mod resolve;

pub use errors::{SourceError, SourceResult};
pub use format::SourceFormat;
pub use frame::Frame;
pub use resolve::{resolve_sources, ResolvedSource};
