/// Batch rendering on a worker pool.
pub mod batch;
/// Per-frame diagnostics and the visited stage sequence.
pub mod diagnostics;
/// The per-frame stage machine.
pub mod renderer;
