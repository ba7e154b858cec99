// NerView - core/mod.rs
//
// Core logic layer: label normalisation, colour assignment, export.
// Pure functions over the data model.
// Must NOT depend on: ui, platform, app.

pub mod colour;
pub mod export;
pub mod labels;
pub mod model;
