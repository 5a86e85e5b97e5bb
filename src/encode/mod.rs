//! Encoding sinks.
//!
//! Sinks consume rendered frames in animation order and are driven by
//! [`crate::render::pipeline::assemble_animation`].

/// Animated GIF sink.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
