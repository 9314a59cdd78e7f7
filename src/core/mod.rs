// EstateActivity - core/mod.rs
//
// Core business logic layer: entry model, filtering, statistics, export,
// seed fixtures.
// Must NOT depend on: app, platform, or any filesystem I/O.

pub mod export;
pub mod filter;
pub mod model;
pub mod seed;
pub mod stats;
