//! CLI command implementations.

pub mod build;
pub mod watch;

pub use build::build_docs;
pub use watch::watch_docs;
