// NerView - lib.rs
//
// Library entry point, exposing all non-CLI modules for integration testing
// and programmatic use.
//
// The command-line front end lives in `main.rs` and is not part of the
// library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
