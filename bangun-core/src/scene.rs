//! Scene state: the displayed shape group and the controller that owns it.
use nalgebra::{Matrix4, Rotation3, Vector3};

use crate::config::{hex_to_rgb, ViewerConfig};
use crate::factory::ShapeFactory;
use crate::net::{FacePlacement, NetLayout};
use crate::resource::{Geometry, GeometryId, GeometryPool};
use crate::shape::ShapeId;

/// Flat Lambert material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    /// Render back faces as well; only the cube's loose faces need this.
    pub double_sided: bool,
}

impl Material {
    pub fn lambert(color: u32) -> Self {
        Self {
            color: hex_to_rgb(color),
            double_sided: false,
        }
    }

    pub fn double_sided(self) -> Self {
        Self {
            double_sided: true,
            ..self
        }
    }
}

/// Lambert intensity of a face with unit `normal` under a directional light
/// shining from unit `light`, plus a flat `ambient` term, clamped to 1.
pub fn lambert(normal: &Vector3<f32>, light: &Vector3<f32>, ambient: f32) -> f32 {
    (ambient + normal.dot(light).max(0.0)).min(1.0)
}

/// One drawable piece of a shape group.
#[derive(Debug)]
pub struct SceneMesh {
    pub geometry: Geometry,
    pub material: Material,
    /// Translation relative to the group origin.
    pub position: Vector3<f32>,
    /// Present only on faces that take part in the net layout.
    pub placement: Option<FacePlacement>,
}

impl SceneMesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            position: Vector3::zeros(),
            placement: None,
        }
    }

    /// Attach a net placement and move the mesh to its closed position.
    pub fn with_placement(mut self, placement: FacePlacement) -> Self {
        self.position = placement.closed;
        self.placement = Some(placement);
        self
    }
}

/// The meshes that make up the currently displayed solid.
///
/// All meshes share the group's rotation, which is applied after each
/// mesh's own translation so faces spread along the rotated axes.
#[derive(Debug)]
pub struct ShapeGroup {
    shape: ShapeId,
    meshes: Vec<SceneMesh>,
    /// Accumulated rotation about X, Y and Z (radians).
    rotation: Vector3<f32>,
}

impl ShapeGroup {
    pub fn new(shape: ShapeId) -> Self {
        Self {
            shape,
            meshes: Vec::new(),
            rotation: Vector3::zeros(),
        }
    }

    pub fn add(&mut self, mesh: SceneMesh) {
        self.meshes.push(mesh);
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn geometry_ids(&self) -> Vec<GeometryId> {
        self.meshes.iter().map(|m| m.geometry.id()).collect()
    }

    /// Move every placed mesh to its position for `layout`.
    ///
    /// Returns how many meshes were moved; meshes without a placement keep
    /// their transform.
    pub fn apply_layout(&mut self, layout: NetLayout) -> usize {
        let mut moved = 0;
        for mesh in &mut self.meshes {
            if let Some(placement) = mesh.placement {
                mesh.position = placement.position(layout);
                moved += 1;
            }
        }
        moved
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    /// Turn the whole group by `delta` radians about X, Y and Z.
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    /// Rotation applied about Z, then Y, then X.
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z).to_homogeneous()
    }

    pub fn model_matrix(&self, mesh: &SceneMesh) -> Matrix4<f32> {
        self.rotation_matrix() * Matrix4::new_translation(&mesh.position)
    }

    /// Release every mesh's geometry and consume the group.
    ///
    /// Returns the number of geometries released.
    pub fn dispose(mut self) -> usize {
        let released = self.meshes.len();
        for mesh in self.meshes.drain(..) {
            drop(mesh.geometry);
        }
        released
    }
}

/// Owns the displayed shape group and the net layout.
///
/// At most one group is live. Replacing or clearing it releases its
/// geometry before anything new is built, and dropping the controller
/// releases whatever is still displayed.
#[derive(Debug)]
pub struct SceneController {
    factory: ShapeFactory,
    group: Option<ShapeGroup>,
    net: NetLayout,
    rotation_step: f32,
}

impl SceneController {
    pub fn new(pool: GeometryPool, config: &ViewerConfig) -> Self {
        Self {
            factory: ShapeFactory::new(pool, config.color),
            group: None,
            net: NetLayout::Closed,
            rotation_step: config.rotation_step,
        }
    }

    /// Replace the displayed shape with a freshly built `id`.
    pub fn select(&mut self, id: ShapeId) -> &ShapeGroup {
        self.clear();
        let group = self.factory.build(id);
        tracing::info!(shape = %id, meshes = group.len(), "shape loaded");
        self.group.insert(group)
    }

    /// Release the displayed shape, leaving the scene empty.
    pub fn clear(&mut self) {
        self.net = NetLayout::Closed;
        if let Some(group) = self.group.take() {
            let shape = group.shape();
            let released = group.dispose();
            tracing::debug!(%shape, released, "shape cleared");
        }
    }

    /// Flip the net layout and move the faces that support it.
    ///
    /// The layout flips even when nothing, or a shape without a net, is
    /// displayed.
    pub fn toggle_net(&mut self) -> NetLayout {
        self.net = self.net.toggled();
        if let Some(group) = self.group.as_mut() {
            let moved = group.apply_layout(self.net);
            tracing::debug!(layout = ?self.net, moved, "net toggled");
        }
        self.net
    }

    /// Advance the idle rotation by one frame.
    pub fn tick(&mut self) {
        if let Some(group) = self.group.as_mut() {
            group.rotate(Vector3::y() * self.rotation_step);
        }
    }

    /// Rotate the displayed shape by an explicit amount.
    pub fn nudge(&mut self, dx: f32, dy: f32, dz: f32) {
        if let Some(group) = self.group.as_mut() {
            group.rotate(Vector3::new(dx, dy, dz));
        }
    }

    pub fn group(&self) -> Option<&ShapeGroup> {
        self.group.as_ref()
    }

    pub fn net_layout(&self) -> NetLayout {
        self.net
    }

    pub fn pool(&self) -> &GeometryPool {
        self.factory.pool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn controller() -> SceneController {
        SceneController::new(GeometryPool::new(), &ViewerConfig::default())
    }

    fn positions(scene: &SceneController) -> Vec<Vector3<f32>> {
        scene
            .group()
            .map(|g| g.meshes().iter().map(|m| m.position).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_lambert_leaves_unlit_faces_black() {
        let light = Vector3::z();
        assert_eq!(lambert(&-Vector3::z(), &light, 0.0), 0.0);
        assert_eq!(lambert(&Vector3::x(), &light, 0.0), 0.0);
        assert_relative_eq!(lambert(&Vector3::z(), &light, 0.0), 1.0);
        assert_relative_eq!(lambert(&-Vector3::z(), &light, 0.3), 0.3);
        assert_relative_eq!(lambert(&Vector3::z(), &light, 0.3), 1.0);
    }

    #[test]
    fn test_select_replaces_group() {
        let mut scene = controller();
        let old_ids = scene.select(ShapeId::Cube).geometry_ids();
        assert_eq!(scene.pool().live_count(), 6);

        scene.select(ShapeId::Cone);
        assert_eq!(scene.group().map(|g| g.shape()), Some(ShapeId::Cone));
        assert_eq!(scene.pool().live_count(), 1);
        for id in old_ids {
            assert!(!scene.pool().is_live(id));
        }
    }

    #[test]
    fn test_clear_empties_scene() {
        let mut scene = controller();
        scene.select(ShapeId::Cylinder);
        scene.clear();
        assert!(scene.group().is_none());
        assert_eq!(scene.pool().live_count(), 0);
    }

    #[test]
    fn test_toggle_net_twice_restores_cube() {
        let mut scene = controller();
        scene.select(ShapeId::Cube);
        let closed = positions(&scene);

        assert!(scene.toggle_net().is_open());
        let open = positions(&scene);
        assert_ne!(open, closed);

        assert!(!scene.toggle_net().is_open());
        assert_eq!(positions(&scene), closed);
    }

    #[test]
    fn test_toggle_net_ignores_other_shapes() {
        let mut scene = controller();
        scene.select(ShapeId::Pyramid(crate::shape::SideCount::SQUARE));
        let before = positions(&scene);
        let rotation = scene.group().map(|g| g.rotation());

        assert!(scene.toggle_net().is_open());
        assert_eq!(positions(&scene), before);
        assert_eq!(scene.group().map(|g| g.rotation()), rotation);
    }

    #[test]
    fn test_select_resets_net_layout() {
        let mut scene = controller();
        scene.select(ShapeId::Cube);
        scene.toggle_net();
        scene.select(ShapeId::Cube);
        assert_eq!(scene.net_layout(), NetLayout::Closed);
        assert!(positions(&scene).iter().all(|p| *p == Vector3::zeros()));
    }

    #[test]
    fn test_toggle_without_group_flips_state() {
        let mut scene = controller();
        assert!(scene.toggle_net().is_open());
        assert!(scene.group().is_none());
    }

    #[test]
    fn test_tick_rotates_about_y() {
        let mut scene = controller();
        scene.tick();
        scene.select(ShapeId::Cuboid);
        for _ in 0..10 {
            scene.tick();
        }
        let rotation = scene.group().map(|g| g.rotation()).unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(rotation.y, 0.1, epsilon = 1e-5);
        assert_eq!(rotation.x, 0.0);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_nudge_accumulates_on_top_of_tick() {
        let mut scene = controller();
        scene.nudge(1.0, 1.0, 1.0);
        assert!(scene.group().is_none());

        scene.select(ShapeId::Cube);
        scene.nudge(0.2, -0.1, 0.3);
        scene.tick();
        let rotation = scene.group().map(|g| g.rotation()).unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(rotation, Vector3::new(0.2, -0.09, 0.3), epsilon = 1e-6);
    }

    #[test]
    fn test_open_cube_face_follows_group_rotation() {
        let mut scene = controller();
        scene.select(ShapeId::Cube);
        scene.toggle_net();
        scene.nudge(0.0, std::f32::consts::FRAC_PI_2, 0.0);

        let group = scene.group().unwrap();
        // The front face opens along +Z; a quarter turn about Y carries it to +X.
        let front = &group.meshes()[0];
        let center = group.model_matrix(front).transform_point(&Point3::origin());
        assert_relative_eq!(center, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_matrix_order() {
        let mut group = ShapeGroup::new(ShapeId::Cuboid);
        assert_relative_eq!(group.rotation_matrix(), Matrix4::identity());

        // X turns first: +Y goes to +Z, then Y carries that to +X.
        group.rotate(Vector3::new(std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2, 0.0));
        let up = group.rotation_matrix().transform_vector(&Vector3::y());
        assert_relative_eq!(up, Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_dropping_controller_releases_geometry() {
        let pool = GeometryPool::new();
        let mut scene = SceneController::new(pool.clone(), &ViewerConfig::default());
        scene.select(ShapeId::Cube);
        assert_eq!(pool.live_count(), 6);
        drop(scene);
        assert_eq!(pool.live_count(), 0);
    }
}
