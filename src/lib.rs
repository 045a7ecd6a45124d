pub mod api;
pub mod cache;
pub mod config;
pub mod render;
pub mod sources;
pub mod stats;
