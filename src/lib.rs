// EstateActivity - lib.rs
//
// Library entry point. Everything the CLI viewer uses lives here so other
// callers (and the integration tests) get the same store and queries.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
