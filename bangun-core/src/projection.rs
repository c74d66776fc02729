//! Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;

/// Perspective camera for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, config.distance),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a 3D point to 2D screen space
    ///
    /// Returns `(x, y, depth)` with depth in NDC, or `None` when the point
    /// lies behind the camera or outside the depth range. Points off the
    /// sides of the screen are kept so rasterizers can clip partially
    /// visible triangles.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }

    #[test]
    fn test_camera_creation() {
        let camera = camera();
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_relative_eq!(camera.fov, 75f32.to_radians());
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_view_puts_origin_in_front_of_camera() {
        let origin = camera().view_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-6);
    }

    #[test]
    fn test_set_aspect_widens_projection() {
        let mut camera = camera();
        let tall = camera.projection_matrix();
        camera.set_aspect(2.0);
        let wide = camera.projection_matrix();
        assert_relative_eq!(camera.aspect, 2.0);
        // Same vertical field of view, narrower horizontal scale.
        assert_relative_eq!(wide[(1, 1)], tall[(1, 1)]);
        assert!(wide[(0, 0)] < tall[(0, 0)]);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = camera();
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert_relative_eq!(x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(y, 300.0, epsilon = 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = camera();
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = camera();
        let (_, y, _) = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!(y < 300.0);
    }
}
