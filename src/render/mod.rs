/// Rasterization backends.
pub mod backend;
/// Mesh-only RGBA layer.
pub mod layer;
/// Triangle setup and scan conversion.
pub mod raster;
/// Skeleton segments and joint markers.
pub mod skeleton;
/// The per-invocation RGB pixel buffer.
pub mod surface;
