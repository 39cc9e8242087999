/// Renderer configuration.
pub mod config;
/// Mesh boundary model.
pub mod mesh;
/// Skeleton boundary model.
pub mod skeleton;
