//! Scene composition on the CPU.
//!
//! Every layer is rasterized with `vello_cpu` into its own surface and blended onto the frame
//! with the kernels in [`composite`]. All buffers are premultiplied RGBA8.

/// Pixel blending kernels.
pub mod composite;
/// The scene renderer.
pub mod cpu;
/// Scene geometry: image fitting, lamp box, light cone.
pub mod layout;
/// Last-triggered-wins render publication.
pub mod scheduler;
pub(crate) mod text;
