// NerView - ui/mod.rs
//
// UI layer: terminal presentation only.
// Dependencies: core (read-only models), crossterm.
// Must NOT depend on: app, platform, direct I/O.

pub mod render;
pub mod theme;
