/// Rotation state and the two rotation pipelines
use nalgebra::{Point3, Rotation3, Vector3};

/// Accumulated rotation around the three axes (in radians).
///
/// Angles grow without wraparound; sine and cosine are periodic, so no
/// reduction is needed.
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians).
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

fn axis_rotations(rotation: &RotationState) -> (Rotation3<f32>, Rotation3<f32>, Rotation3<f32>) {
    (
        Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x),
        Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y),
        Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z),
    )
}

/// The wireframe pipeline: rotate about X, then Y, then Z, each step
/// consuming the previous step's coordinates. Equivalent to `Rz·Ry·Rx·p`.
pub fn rotate_xyz(p: &Point3<f32>, rotation: &RotationState) -> Point3<f32> {
    let (rx, ry, rz) = axis_rotations(rotation);
    rz * (ry * (rx * p))
}

/// The z-buffer pipeline: rotate about X then Y only, exposing the rotated
/// z as the depth value alongside the point.
///
/// Not interchangeable with [`rotate_xyz`]; the two compose different axis
/// sequences.
pub fn rotate_xy(p: &Point3<f32>, rotation: &RotationState) -> (Point3<f32>, f32) {
    let (rx, ry, _) = axis_rotations(rotation);
    let rotated = ry * (rx * p);
    (rotated, rotated.z)
}
