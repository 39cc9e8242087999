//! meshoverlay renders a body mesh and a 2D skeleton over a video frame, entirely on the CPU.
//!
//! Every call is a pure function of one frame's inputs:
//!
//! - Validate the [`MeshFrame`] against the expected [`MeshTopology`]
//! - Project vertices through the crop-to-full perspective camera ([`FullCamera`])
//! - Order faces far-to-near and rasterize them with alpha blending (painter's algorithm)
//! - Draw the [`SkeletonFrame`] on top, fully opaque
//!
//! Mesh failures never escape: the [`OverlayRenderer`] degrades to skeleton-only output and
//! records why in [`Diagnostics`].
#![forbid(unsafe_code)]

mod foundation;

/// Per-frame mesh stages: validation, projection and depth ordering.
pub mod mesh;
/// Frame orchestration, diagnostics and batch rendering.
pub mod pipeline;
/// Pixel surfaces, rasterization backends and skeleton drawing.
pub mod render;
/// Boundary data models consumed from the pose-estimation collaborator.
pub mod scene;

pub use crate::foundation::core::{ImageSize, Rgb8};
pub use crate::foundation::error::{OverlayError, OverlayResult};

pub use crate::mesh::depth::{FaceDepth, sort_faces_far_to_near};
pub use crate::mesh::project::{FullCamera, ProjectedVertex, Projection, project_vertices};
pub use crate::mesh::validate::{MeshRejection, validate_mesh};
pub use crate::pipeline::batch::{FrameJob, RenderThreading};
pub use crate::pipeline::diagnostics::{Diagnostics, Stage};
pub use crate::pipeline::renderer::{OverlayRenderer, RenderedFrame};
pub use crate::render::backend::{BackendKind, RasterBackend, RasterStats, create_backend};
pub use crate::render::layer::render_mesh_layer;
pub use crate::render::surface::RenderSurface;
pub use crate::scene::config::{MeshTopology, OverlayConfig};
pub use crate::scene::mesh::{CameraCrop, CropBox, MeshFrame};
pub use crate::scene::skeleton::{Joint, SMPL_JOINT_NAMES, SkeletonFrame};
