use image::RgbaImage;

use crate::foundation::error::OverlayResult;
use crate::foundation::math::{over_premul, premul_rgba};
use crate::mesh::depth::{painter_triangles, sort_faces_far_to_near};
use crate::mesh::project::project_vertices;
use crate::mesh::validate::validate_mesh;
use crate::render::raster::ScreenTriangle;
use crate::scene::config::OverlayConfig;
use crate::scene::mesh::MeshFrame;

/// Rasterize the mesh alone into a transparent, premultiplied RGBA8 layer.
///
/// Faces are composited source-over in painter's order, each at `mesh_alpha`, so overlapping
/// faces accumulate coverage the same way they do on the video frame. Useful for callers that
/// composite the mesh themselves; [`crate::OverlayRenderer`] blends straight onto the frame
/// instead.
pub fn render_mesh_layer(mesh: &MeshFrame, cfg: &OverlayConfig) -> OverlayResult<RgbaImage> {
    validate_mesh(mesh, &cfg.topology)?;
    let projection = project_vertices(mesh, cfg.depth_epsilon);
    let order = sort_faces_far_to_near(&mesh.faces, &projection);
    let triangles = painter_triangles(&mesh.faces, &order, &projection);

    let size = mesh.image_size;
    let src = premul_rgba(cfg.mesh_color.to_array(), cfg.mesh_alpha);
    let mut layer = RgbaImage::new(size.width, size.height);
    for corners in triangles {
        let Ok(tri) = ScreenTriangle::setup(corners, size) else {
            continue;
        };
        let b = tri.bounds();
        for y in b.y0..=b.y1 {
            for x in b.x0..=b.x1 {
                if tri.covers(x, y) {
                    let px = layer.get_pixel_mut(x, y);
                    px.0 = over_premul(px.0, src);
                }
            }
        }
    }
    Ok(layer)
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
