/// Z-buffered flat-fill rasterizer
use crate::geometry::{Color, ScenePolygon};
use crate::projection::Camera;
use crate::transform::{rotate_xy, RotationState};

/// A projected vertex: device x, device y, rotated-space depth.
pub type ScreenVertex = (f32, f32, f32);

/// Triangles with a barycentric denominator below this magnitude have zero
/// area and are skipped whole.
const DEGENERATE_EPS: f32 = 1e-6;

/// Per-frame depth and color buffers, flat row-major.
///
/// Depth holds the minimum depth written so far at each pixel; color holds
/// the color of the triangle that produced it, `None` meaning background.
/// Cleared at the start of every redraw, never shared between frames.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    depth: Vec<f32>,
    color: Vec<Option<Color>>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; size],
            color: vec![None; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every pixel to background and infinite depth.
    pub fn clear(&mut self) {
        self.depth.fill(f32::INFINITY);
        self.color.fill(None);
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.color[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    /// Iterate only the pixels a triangle actually wrote. Consumers may blit
    /// the full buffer instead; skipping background cells just saves output
    /// bandwidth.
    pub fn written_pixels(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.color
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.map(|color| (i % self.width, i / self.width, color)))
    }
}

/// Fan-triangulate a projected polygon: triangle k is (v0, v(k+1), v(k+2)),
/// n − 2 triangles in total, a bare triangle passing through unchanged.
///
/// Only correct for convex planar polygons; concave input rasterizes
/// incorrectly. That is an accepted limitation of the fan decomposition,
/// callers wanting general polygons must triangulate beforehand.
pub fn fan_triangles(projected: &[ScreenVertex]) -> Vec<[ScreenVertex; 3]> {
    (2..projected.len())
        .map(|i| [projected[0], projected[i - 1], projected[i]])
        .collect()
}

/// Rotate (X then Y), project and z-buffer-fill every polygon into `frame`.
///
/// Polygons with fewer than 3 vertices are a caller precondition and simply
/// produce no triangles here. Nothing on this path can fail: degenerate
/// triangles are skipped and out-of-viewport coverage is clamped away.
pub fn render(
    polygons: &[ScenePolygon],
    rotation: &RotationState,
    camera: &Camera,
    frame: &mut FrameBuffer,
) {
    let mut triangle_count = 0usize;
    for polygon in polygons {
        let projected: Vec<ScreenVertex> = polygon
            .points
            .iter()
            .map(|p| {
                let (rotated, depth) = rotate_xy(p, rotation);
                camera.project_with_depth(&rotated, depth)
            })
            .collect();

        for triangle in fan_triangles(&projected) {
            fill_triangle(&triangle, polygon.color, frame);
            triangle_count += 1;
        }
    }
    log::debug!(
        "rasterized {} polygons as {} triangles",
        polygons.len(),
        triangle_count
    );
}

/// Fill one screen-space triangle against the depth buffer.
///
/// Every integer pixel of the viewport-clamped bounding box is tested with
/// barycentric weights; all three non-negative means inside, edges
/// inclusive. Depth interpolates linearly from the vertices and a strictly
/// nearer value wins the pixel.
fn fill_triangle(triangle: &[ScreenVertex; 3], color: Color, frame: &mut FrameBuffer) {
    let [(x1, y1, z1), (x2, y2, z2), (x3, y3, z3)] = *triangle;

    let denom = (y2 - y3) * (x1 - x3) + (x3 - x2) * (y1 - y3);
    if denom.abs() < DEGENERATE_EPS {
        return;
    }

    let min_x = (x1.min(x2).min(x3).floor() as i32).max(0);
    let max_x = (x1.max(x2).max(x3).ceil() as i32).min(frame.width as i32 - 1);
    let min_y = (y1.min(y2).min(y3).floor() as i32).max(0);
    let max_y = (y1.max(y2).max(y3).ceil() as i32).min(frame.height as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32, y as f32);
            let a = ((y2 - y3) * (px - x3) + (x3 - x2) * (py - y3)) / denom;
            let b = ((y3 - y1) * (px - x3) + (x1 - x3) * (py - y3)) / denom;
            let c = 1.0 - a - b;
            if a >= 0.0 && b >= 0.0 && c >= 0.0 {
                let z = a * z1 + b * z2 + c * z3;
                let idx = y as usize * frame.width + x as usize;
                if z < frame.depth[idx] {
                    frame.depth[idx] = z;
                    frame.color[idx] = Some(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const RED: Color = Color::new(0xff, 0x00, 0x00);
    const BLUE: Color = Color::new(0x00, 0x00, 0xff);

    fn screen_camera(size: u32) -> Camera {
        // Identity-ish device mapping: unit scale, center in the viewport
        Camera {
            center_x: size as f32 / 2.0,
            center_y: size as f32 / 2.0,
            scale: 1.0,
            zoom: 1.0,
            mode: crate::projection::ProjectionMode::Orthographic,
        }
    }

    fn polygon(points: &[(f32, f32, f32)], color: Color) -> ScenePolygon {
        ScenePolygon {
            points: points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect(),
            color,
        }
    }

    #[test]
    fn test_fan_triangulation_counts() {
        for n in 3..8 {
            let projected: Vec<ScreenVertex> =
                (0..n).map(|i| (i as f32, (i * i) as f32, 0.0)).collect();
            let triangles = fan_triangles(&projected);
            assert_eq!(triangles.len(), n - 2);
            for triangle in &triangles {
                assert_eq!(triangle[0], projected[0]);
            }
        }
    }

    #[test]
    fn test_fan_of_triangle_passes_through() {
        let projected = [(0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (0.0, 4.0, 0.0)];
        let triangles = fan_triangles(&projected);
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0], projected);
    }

    #[test]
    fn test_degenerate_triangle_writes_nothing() {
        let mut frame = FrameBuffer::new(64, 64);
        // Collinear points stay collinear under orthographic projection
        let poly = polygon(&[(-10.0, 0.0, 0.0), (0.0, 0.0, 0.0), (10.0, 0.0, 0.0)], RED);
        render(&[poly], &RotationState::zero(), &screen_camera(64), &mut frame);
        assert_eq!(frame.written_pixels().count(), 0);
    }

    #[test]
    fn test_nearer_triangle_wins_either_draw_order() {
        let camera = screen_camera(64);
        let near = polygon(&[(-20.0, -20.0, 1.0), (20.0, -20.0, 1.0), (0.0, 20.0, 1.0)], RED);
        let far = polygon(&[(-20.0, -20.0, 2.0), (20.0, -20.0, 2.0), (0.0, 20.0, 2.0)], BLUE);

        let mut near_first = FrameBuffer::new(64, 64);
        render(
            &[near.clone(), far.clone()],
            &RotationState::zero(),
            &camera,
            &mut near_first,
        );
        let mut far_first = FrameBuffer::new(64, 64);
        render(&[far, near], &RotationState::zero(), &camera, &mut far_first);

        let mut covered = 0usize;
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(near_first.color_at(x, y), far_first.color_at(x, y));
                if let Some(color) = near_first.color_at(x, y) {
                    assert_eq!(color, RED);
                    covered += 1;
                }
            }
        }
        assert!(covered > 0);
    }

    #[test]
    fn test_depth_interpolates_across_triangle() {
        let mut frame = FrameBuffer::new(64, 64);
        let camera = screen_camera(64);
        // Ramp from depth -1 on the left edge to 1 on the right
        let poly = polygon(&[(-20.0, -20.0, -1.0), (20.0, -20.0, 1.0), (20.0, 20.0, 1.0)], RED);
        render(&[poly], &RotationState::zero(), &camera, &mut frame);
        let left = frame.depth_at(14, 52);
        let right = frame.depth_at(50, 52);
        assert!(left < right);
        assert!(frame.depth_at(50, 52) <= 1.0 + 1e-3);
    }

    #[test]
    fn test_bounding_box_clamped_to_viewport() {
        let mut frame = FrameBuffer::new(32, 32);
        // Far larger than the viewport; must fill every pixel without panicking
        let poly = polygon(
            &[(-500.0, -500.0, 0.0), (500.0, -500.0, 0.0), (0.0, 500.0, 0.0)],
            BLUE,
        );
        render(&[poly], &RotationState::zero(), &screen_camera(32), &mut frame);
        for (x, y, _) in frame.written_pixels() {
            assert!(x < 32 && y < 32);
        }
        assert!(frame.written_pixels().count() > 0);
    }

    #[test]
    fn test_undersized_polygons_produce_no_triangles() {
        assert!(fan_triangles(&[]).is_empty());
        assert!(fan_triangles(&[(0.0, 0.0, 0.0)]).is_empty());
        assert!(fan_triangles(&[(0.0, 0.0, 0.0), (1.0, 1.0, 0.0)]).is_empty());
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut frame = FrameBuffer::new(16, 16);
        let poly = polygon(&[(-5.0, -5.0, 0.0), (5.0, -5.0, 0.0), (0.0, 5.0, 0.0)], RED);
        render(&[poly], &RotationState::zero(), &screen_camera(16), &mut frame);
        assert!(frame.written_pixels().count() > 0);
        frame.clear();
        assert_eq!(frame.written_pixels().count(), 0);
        assert_eq!(frame.depth_at(8, 8), f32::INFINITY);
    }

    #[test]
    fn test_quad_fills_between_fan_seams() {
        // The shared diagonal of a fanned quad must not leave holes
        let mut frame = FrameBuffer::new(64, 64);
        let quad = polygon(
            &[
                (-10.0, -10.0, 0.0),
                (10.0, -10.0, 0.0),
                (10.0, 10.0, 0.0),
                (-10.0, 10.0, 0.0),
            ],
            BLUE,
        );
        render(&[quad], &RotationState::zero(), &screen_camera(64), &mut frame);
        // Interior of the quad in device space: x in [22,42], y in [22,42]
        for y in 24..40 {
            for x in 24..40 {
                assert_eq!(frame.color_at(x, y), Some(BLUE));
            }
        }
    }
}
