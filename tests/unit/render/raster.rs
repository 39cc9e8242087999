use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn coverage_counts(tris: &[[Point; 3]], size: ImageSize) -> Vec<u32> {
    let mut counts = vec![0u32; (size.width * size.height) as usize];
    for corners in tris {
        let Ok(tri) = ScreenTriangle::setup(*corners, size) else {
            continue;
        };
        let b = tri.bounds();
        for y in b.y0..=b.y1 {
            for x in b.x0..=b.x1 {
                if tri.covers(x, y) {
                    counts[(y * size.width + x) as usize] += 1;
                }
            }
        }
    }
    counts
}

#[test]
fn collinear_corners_are_degenerate() {
    let size = ImageSize::new(16, 16);
    let err = ScreenTriangle::setup([pt(1.0, 1.0), pt(5.0, 5.0), pt(9.0, 9.0)], size);
    assert_eq!(err.unwrap_err(), TriangleCull::Degenerate);

    // Area below one subpixel step collapses too.
    let tiny = ScreenTriangle::setup([pt(1.0, 1.0), pt(1.001, 1.0), pt(1.0, 1.001)], size);
    assert_eq!(tiny.unwrap_err(), TriangleCull::Degenerate);
}

#[test]
fn triangles_outside_the_image_are_rejected_early() {
    let size = ImageSize::new(16, 16);
    let left = ScreenTriangle::setup([pt(-30.0, 0.0), pt(-20.0, 0.0), pt(-25.0, 10.0)], size);
    assert_eq!(left.unwrap_err(), TriangleCull::OffImage);
    let below = ScreenTriangle::setup([pt(0.0, 40.0), pt(10.0, 40.0), pt(5.0, 30.0)], size);
    assert_eq!(below.unwrap_err(), TriangleCull::OffImage);
}

#[test]
fn non_finite_or_far_corners_are_out_of_range() {
    let size = ImageSize::new(16, 16);
    let nan = ScreenTriangle::setup([pt(f64::NAN, 0.0), pt(1.0, 0.0), pt(0.0, 1.0)], size);
    assert_eq!(nan.unwrap_err(), TriangleCull::OutOfRange);
    let far = ScreenTriangle::setup([pt(1e15, 0.0), pt(1.0, 0.0), pt(0.0, 1.0)], size);
    assert_eq!(far.unwrap_err(), TriangleCull::OutOfRange);
}

#[test]
fn bounds_are_clipped_to_the_image_for_edge_spanning_triangles() {
    let size = ImageSize::new(10, 10);
    let tri = ScreenTriangle::setup([pt(-5.0, -5.0), pt(20.0, -5.0), pt(-5.0, 20.0)], size).unwrap();
    assert_eq!(
        tri.bounds(),
        PixelRect {
            x0: 0,
            y0: 0,
            x1: 9,
            y1: 9
        }
    );
    assert!(tri.covers(0, 0));
    assert!(!tri.covers(9, 9));
}

#[test]
fn top_left_rule_keeps_top_and_left_edges_only() {
    // Square with corners on pixel centres (0.5, 0.5)..(3.5, 3.5), split on the diagonal.
    let size = ImageSize::new(5, 5);
    let tris = [
        [pt(0.5, 0.5), pt(3.5, 0.5), pt(3.5, 3.5)],
        [pt(0.5, 0.5), pt(3.5, 3.5), pt(0.5, 3.5)],
    ];
    let counts = coverage_counts(&tris, size);
    for y in 0..5u32 {
        for x in 0..5u32 {
            let expected = u32::from(x < 3 && y < 3);
            assert_eq!(counts[(y * 5 + x) as usize], expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn triangle_fan_is_watertight_regardless_of_winding() {
    let size = ImageSize::new(8, 8);
    let c = pt(4.3, 3.7);
    let ring = [
        pt(0.0, 0.0),
        pt(4.0, 0.0),
        pt(8.0, 0.0),
        pt(8.0, 4.0),
        pt(8.0, 8.0),
        pt(4.0, 8.0),
        pt(0.0, 8.0),
        pt(0.0, 4.0),
    ];
    let tris: Vec<[Point; 3]> = (0..ring.len())
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
            if i % 2 == 0 { [c, a, b] } else { [c, b, a] }
        })
        .collect();
    let counts = coverage_counts(&tris, size);
    assert!(counts.iter().all(|&n| n == 1), "{counts:?}");
}

#[test]
fn winding_does_not_change_coverage() {
    let size = ImageSize::new(12, 12);
    let cw = coverage_counts(&[[pt(1.2, 0.7), pt(10.1, 3.3), pt(4.4, 11.0)]], size);
    let ccw = coverage_counts(&[[pt(1.2, 0.7), pt(4.4, 11.0), pt(10.1, 3.3)]], size);
    assert_eq!(cw, ccw);
    assert!(cw.iter().any(|&n| n == 1));
}

#[test]
fn paint_table_matches_blend_formula() {
    let paint = MeshPaint::new([166, 189, 219], 0.6);
    let mut px = [255u8, 255, 255];
    paint.apply(&mut px);
    assert_eq!(px, [202, 215, 233]);
    assert_eq!(paint.alpha(), 0.6);
    assert_eq!(MeshPaint::new([1, 2, 3], 7.0).alpha(), 1.0);
}

#[test]
fn banded_fill_matches_single_pass() {
    let size = ImageSize::new(9, 7);
    let paint = MeshPaint::new([10, 200, 90], 0.5);
    let tris = [
        ScreenTriangle::setup([pt(0.0, 0.0), pt(9.0, 1.0), pt(2.0, 7.0)], size).unwrap(),
        ScreenTriangle::setup([pt(9.0, 7.0), pt(1.0, 2.0), pt(8.0, 0.5)], size).unwrap(),
    ];

    let stride = (size.width * 3) as usize;
    let mut whole = vec![255u8; stride * size.height as usize];
    let mut written_whole = 0;
    for t in &tris {
        written_whole += t.fill_band(&mut whole, size.width, 0, size.height, &paint);
    }

    let mut banded = vec![255u8; stride * size.height as usize];
    let mut written_banded = 0;
    for (band_idx, band) in banded.chunks_mut(stride * 3).enumerate() {
        let y0 = band_idx as u32 * 3;
        let y1 = (y0 + 3).min(size.height);
        for t in &tris {
            written_banded += t.fill_band(band, size.width, y0, y1, &paint);
        }
    }

    assert_eq!(whole, banded);
    assert_eq!(written_whole, written_banded);
    assert!(written_whole > 0);
}
