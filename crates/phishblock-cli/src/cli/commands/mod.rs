//! CLI command handlers, one per file.

mod check;
mod checksum;
mod run;
mod sources;

pub use check::run_check;
pub use checksum::run_checksum;
pub use run::run_feeds;
pub use sources::run_sources;
