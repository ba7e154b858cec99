// NerView - platform/mod.rs
//
// Platform abstraction layer: directory resolution, config.toml loading,
// and file input/output helpers.
// Dependencies: util (constants, error types), directories, toml, serde.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
