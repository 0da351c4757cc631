pub mod config;
pub mod logging;

pub mod blocklist;
pub mod checksum;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod select;
