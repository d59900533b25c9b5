//! Position + yaw/pitch camera with view/projection matrix construction.
//!
//! Ported from `world/camera.cpp`. World +Y is up, the coordinate system is
//! right-handed, and `theta == 0` looks down -Z.

use nalgebra::{Matrix4, Vector3};

const DEG2RAD: f32 = std::f32::consts::PI / 180.0;

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vector3<f32>,
    theta: f32,
    phi: f32,
    width: f32,
    height: f32,
    aspect_ratio: f32,
    field_of_view: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            position: Vector3::zeros(),
            theta: 0.0,
            phi: 0.0,
            width: 1920.0,
            height: 1080.0,
            aspect_ratio: 1920.0 / 1080.0,
            field_of_view: 1.047_19,
            z_near: 0.001,
            z_far: 100.0,
        }
    }
}

impl Camera {
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    /// Yaw, in degrees.
    pub fn set_theta(&mut self, degrees: f32) {
        self.theta = degrees * DEG2RAD;
    }

    /// Pitch, in degrees.
    pub fn set_phi(&mut self, degrees: f32) {
        self.phi = degrees * DEG2RAD;
    }

    /// Vertical field of view, in degrees.
    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.field_of_view = degrees * DEG2RAD;
    }

    pub fn set_z_near(&mut self, z_near: f32) {
        self.z_near = z_near;
    }

    pub fn set_z_far(&mut self, z_far: f32) {
        self.z_far = z_far;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.aspect_ratio = self.width / self.height;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
        self.aspect_ratio = self.width / self.height;
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Unit look direction. `theta` is yaw about +Y, `phi` is pitch.
    pub fn forward(&self) -> Vector3<f32> {
        Vector3::new(
            self.theta.sin() * self.phi.cos(),
            self.phi.sin(),
            -self.theta.cos() * self.phi.cos(),
        )
    }

    /// Unit vector to the right of `forward`. Degenerates when looking
    /// straight up or down.
    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(&Vector3::y())
    }

    /// Unit vector perpendicular to both `forward` and `right`.
    pub fn up(&self) -> Vector3<f32> {
        self.right().cross(&self.forward())
    }

    /// Right-handed look-at style view matrix built from the basis vectors.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let z_axis = -self.forward();
        let x_axis = Vector3::y().cross(&z_axis);
        let y_axis = z_axis.cross(&x_axis);

        #[rustfmt::skip]
        let m = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(&self.position),
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(&self.position),
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(&self.position),
            0.0,      0.0,      0.0,      1.0,
        );
        m
    }

    /// Right-handed perspective projection with NDC Z in `[0, 1]`
    /// (`z_near` maps to 0, `z_far` maps to 1).
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let f = 1.0 / (self.field_of_view / 2.0).tan();
        let (zn, zf) = (self.z_near, self.z_far);

        #[rustfmt::skip]
        let m = Matrix4::new(
            f / self.aspect_ratio, 0.0, 0.0,                  0.0,
            0.0,                   f,   0.0,                  0.0,
            0.0,                   0.0, zf / (zn - zf),        (zf * zn) / (zn - zf),
            0.0,                   0.0, -1.0,                  0.0,
        );
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_forward_looks_down_negative_z() {
        let cam = Camera::default();
        assert_relative_eq!(cam.forward(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn basis_vectors_are_orthonormal() {
        let mut cam = Camera::default();
        cam.set_theta(37.0);
        cam.set_phi(12.0);

        let f = cam.forward();
        let r = cam.right();
        let u = cam.up();

        assert_relative_eq!(f.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(r.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(&r), 0.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(&u), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn view_matrix_places_forward_point_on_negative_z() {
        let mut cam = Camera::default();
        cam.set_theta(90.0); // looking down +X

        let view = cam.view_matrix();
        // A world point two units along the camera's forward axis should
        // land directly in front of the camera, i.e. at camera-space z = -2.
        let point_ahead = nalgebra::Vector4::new(2.0, 0.0, 0.0, 1.0);
        let cam_space = view * point_ahead;

        assert_relative_eq!(cam_space.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam_space.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam_space.z, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn projection_maps_near_and_far_to_ndc_bounds() {
        let mut cam = Camera::default();
        cam.set_z_near(1.0);
        cam.set_z_far(10.0);

        let p = cam.projection_matrix();

        let clip_near = p * nalgebra::Vector4::new(0.0, 0.0, -1.0, 1.0);
        let clip_far = p * nalgebra::Vector4::new(0.0, 0.0, -10.0, 1.0);

        assert_relative_eq!(clip_near.z / clip_near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip_far.z / clip_far.w, 1.0, epsilon = 1e-5);
    }
}
