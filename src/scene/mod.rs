//! Scene description: configuration, procedural layout and the prepared per-run scene.

/// Tunable scene parameters with reference defaults.
pub mod config;
/// Seeded generation of buildings, windows and stars.
pub mod layout;
/// Immutable scene resolved once per run and shared by all frames.
pub mod prepared;
