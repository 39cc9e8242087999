/// Far-to-near face ordering.
pub mod depth;
/// Crop-to-full camera and perspective projection.
pub mod project;
/// Structural checks on incoming mesh frames.
pub mod validate;
