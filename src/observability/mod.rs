//! Observability for smiledb
//!
//! Structured JSON logging with explicit severities, plus scopes that bracket
//! the compile, database-initialize and seed phases.
//!
//! ```ignore
//! use smiledb::observability::{Logger, ObservationScope};
//!
//! Logger::info("TABLE_COMPILED", &[("table", "participants")]);
//!
//! let scope = ObservationScope::new("SEED");
//! // ... do work ...
//! scope.complete();
//! ```

mod logger;
mod scope;

pub use logger::{Logger, Severity};
pub use scope::ObservationScope;
