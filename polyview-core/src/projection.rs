/// Screen projection and the per-frame render context
use nalgebra::Point3;

/// Distance from the eye to the projection plane in perspective mode.
pub const FOCAL_DISTANCE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub fn name(self) -> &'static str {
        match self {
            ProjectionMode::Orthographic => "Orthographic",
            ProjectionMode::Perspective => "Perspective",
        }
    }
}

/// Immutable per-frame projection context: viewport center, uniform scale,
/// zoom multiplier and projection mode. Passed by reference into every
/// projection call so redraws stay deterministic.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub center_x: f32,
    pub center_y: f32,
    pub scale: f32,
    pub zoom: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            center_x: width as f32 / 2.0,
            center_y: height as f32 / 2.0,
            scale: 50.0,
            zoom: 1.0,
            mode: ProjectionMode::Orthographic,
        }
    }

    /// Map an already-rotated point to device coordinates.
    ///
    /// Orthographic drops z; perspective scales by `d / (d - z)`, clamped to
    /// a factor of 1 when z equals the focal distance exactly so the mapping
    /// never divides by zero. Device y grows downward while model y grows
    /// upward, hence the sign flip.
    pub fn project(&self, p: &Point3<f32>) -> (f32, f32) {
        let (x, y) = match self.mode {
            ProjectionMode::Orthographic => (p.x, p.y),
            ProjectionMode::Perspective => {
                let d = FOCAL_DISTANCE;
                let factor = if p.z == d { 1.0 } else { d / (d - p.z) };
                (p.x * factor, p.y * factor)
            }
        };
        (
            self.center_x + x * self.scale * self.zoom,
            self.center_y - y * self.scale * self.zoom,
        )
    }

    /// Device coordinates plus a pass-through depth value.
    ///
    /// Depth stays in rotated-camera space, unscaled, for the rasterizer's
    /// comparisons.
    pub fn project_with_depth(&self, p: &Point3<f32>, depth: f32) -> (f32, f32, f32) {
        let (x, y) = self.project(p);
        (x, y, depth)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera(mode: ProjectionMode) -> Camera {
        Camera {
            center_x: 450.0,
            center_y: 350.0,
            scale: 130.0,
            zoom: 1.0,
            mode,
        }
    }

    #[test]
    fn test_orthographic_ignores_z() {
        let cam = camera(ProjectionMode::Orthographic);
        let a = cam.project(&Point3::new(0.4, -0.7, -5.0));
        let b = cam.project(&Point3::new(0.4, -0.7, 42.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_orthographic_device_mapping() {
        // (-1, -1, -1) at scale 130 centered on (450, 350) lands on (320, 480)
        let cam = camera(ProjectionMode::Orthographic);
        let (x, y) = cam.project(&Point3::new(-1.0, -1.0, -1.0));
        assert_relative_eq!(x, 320.0, epsilon = 1e-4);
        assert_relative_eq!(y, 480.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_factor_is_identity_at_plane_origin() {
        let cam = camera(ProjectionMode::Perspective);
        let ortho = camera(ProjectionMode::Orthographic);
        let p = Point3::new(0.6, -0.2, 0.0);
        // d / (d - 0) == 1, so z = 0 projects exactly like orthographic
        assert_eq!(cam.project(&p), ortho.project(&p));
    }

    #[test]
    fn test_perspective_clamps_at_focal_distance() {
        let cam = camera(ProjectionMode::Perspective);
        let (x, y) = cam.project(&Point3::new(1.0, 1.0, FOCAL_DISTANCE));
        assert_relative_eq!(x, 450.0 + 130.0, epsilon = 1e-4);
        assert_relative_eq!(y, 350.0 - 130.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_magnifies_near_points() {
        let cam = camera(ProjectionMode::Perspective);
        let near = cam.project(&Point3::new(1.0, 0.0, 1.0));
        let far = cam.project(&Point3::new(1.0, 0.0, -1.0));
        // factor 3/(3-1) = 1.5 near, 3/(3+1) = 0.75 far
        assert_relative_eq!(near.0, 450.0 + 1.5 * 130.0, epsilon = 1e-3);
        assert_relative_eq!(far.0, 450.0 + 0.75 * 130.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zoom_multiplies_scale() {
        let mut cam = camera(ProjectionMode::Orthographic);
        cam.zoom = 2.0;
        let (x, y) = cam.project(&Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(x, 450.0 + 260.0, epsilon = 1e-4);
        assert_relative_eq!(y, 350.0 - 260.0, epsilon = 1e-4);
    }

    #[test]
    fn test_depth_passes_through_unscaled() {
        let cam = camera(ProjectionMode::Orthographic);
        let (_, _, depth) = cam.project_with_depth(&Point3::new(1.0, 1.0, 0.25), 0.25);
        assert_eq!(depth, 0.25);
    }
}
