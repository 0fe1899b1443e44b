pub mod config;
pub mod dataset;
pub mod graph;
pub mod report;
pub mod setlist;
pub mod show;

/// Band named in messages when the config doesn't say otherwise.
pub const DEFAULT_BAND: &str = "Phish";

/// Application name for XDG paths
pub const APP_NAME: &str = "showdigest";
