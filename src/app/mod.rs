// EstateActivity - app/mod.rs
//
// Application layer: the activity store, its shared handle, and the logging
// helpers other parts of the site call.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod helpers;
pub mod shared;
pub mod store;
