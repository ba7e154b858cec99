// NerView - app/mod.rs
//
// Application layer: history persistence, the prediction-service client,
// and the analysis pipeline that joins them.
// Dependencies: core, platform (file input).
// Must NOT depend on: ui.

pub mod analyze;
pub mod history;
pub mod service;
