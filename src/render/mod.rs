//! Frame rendering.

/// Backend trait and frame buffer type.
pub mod backend;
/// `vello_cpu` rasterizer.
pub mod cpu;
/// Frame-range rendering and animation assembly.
pub mod pipeline;
