#![deny(clippy::all)]

//! AOT cleanup transformer.
//!
//! Lowers framework decorators on classes into plain classes plus a runtime
//! readable `ctorParameters` description of their constructor parameters,
//! so the output can be compiled ahead of time without decorator metadata.

pub mod config;
pub mod error;
pub mod loader;
pub mod run;
pub mod semantic;
pub mod transform_walker;
pub mod transformer;
pub mod utils;

pub use config::AotCleanupOptions;
pub use error::{TransformError, TransformResult};
pub use loader::AotCleanupLoader;
pub use run::AotCleanupRun;
pub use transformer::aot_cleanup_transformer;

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
