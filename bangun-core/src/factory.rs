//! Builds a [`ShapeGroup`] for every [`ShapeId`].
use nalgebra::{Matrix4, Point3, Vector3};

use crate::constants::*;
use crate::geometry::{regular_polygon, Primitive};
use crate::net::FacePlacement;
use crate::resource::GeometryPool;
use crate::scene::{Material, SceneMesh, ShapeGroup};
use crate::shape::{ShapeId, SideCount};

/// Outward axis and orientation of each cube face, in build order:
/// front, back, left, right, top, bottom.
///
/// The rotation turns a +Z facing plane towards the axis.
const CUBE_FACES: [([f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [0.0, 0.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, std::f32::consts::PI, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, -std::f32::consts::FRAC_PI_2, 0.0]),
    ([1.0, 0.0, 0.0], [0.0, std::f32::consts::FRAC_PI_2, 0.0]),
    ([0.0, 1.0, 0.0], [-std::f32::consts::FRAC_PI_2, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [std::f32::consts::FRAC_PI_2, 0.0, 0.0]),
];

/// Creates shape groups whose geometry is registered in one pool.
#[derive(Debug, Clone)]
pub struct ShapeFactory {
    pool: GeometryPool,
    material: Material,
}

impl ShapeFactory {
    pub fn new(pool: GeometryPool, color: u32) -> Self {
        Self {
            pool,
            material: Material::lambert(color),
        }
    }

    pub fn pool(&self) -> &GeometryPool {
        &self.pool
    }

    pub fn build(&self, id: ShapeId) -> ShapeGroup {
        let mut group = ShapeGroup::new(id);
        match id {
            ShapeId::Cube => self.cube(&mut group),
            ShapeId::Cuboid => {
                let [width, height, depth] = CUBOID_DIMENSIONS;
                self.single(&mut group, Primitive::Box { width, height, depth });
            }
            ShapeId::Cylinder => self.single(
                &mut group,
                Primitive::Frustum {
                    radius_top: CYLINDER_RADIUS,
                    radius_bottom: CYLINDER_RADIUS,
                    height: CYLINDER_HEIGHT,
                    segments: ROUND_SEGMENTS,
                },
            ),
            ShapeId::Cone => self.single(
                &mut group,
                Primitive::Frustum {
                    radius_top: 0.0,
                    radius_bottom: CONE_RADIUS,
                    height: CONE_HEIGHT,
                    segments: ROUND_SEGMENTS,
                },
            ),
            ShapeId::Prism(sides) => self.single(&mut group, prism(sides)),
            ShapeId::Pyramid(sides) => self.single(&mut group, pyramid(sides)),
        }
        tracing::debug!(shape = %id, meshes = group.len(), "shape built");
        group
    }

    fn single(&self, group: &mut ShapeGroup, primitive: Primitive) {
        group.add(SceneMesh::new(self.pool.create(primitive), self.material));
    }

    /// Six loose square faces, each placed on its side of the cube.
    fn cube(&self, group: &mut ShapeGroup) {
        let material = self.material.double_sided();
        for ([ax, ay, az], [rx, ry, rz]) in CUBE_FACES {
            let axis = Vector3::new(ax, ay, az);
            let placement = Matrix4::new_translation(&(axis * (CUBE_SIZE / 2.0)))
                * Matrix4::new_rotation(Vector3::new(rx, ry, rz));
            let geometry = self.pool.create_placed(
                Primitive::Plane {
                    width: CUBE_SIZE,
                    height: CUBE_SIZE,
                },
                &placement,
            );
            let face = SceneMesh::new(geometry, material)
                .with_placement(FacePlacement::from_origin(axis * CUBE_OPEN_OFFSET));
            group.add(face);
        }
    }
}

fn prism(sides: SideCount) -> Primitive {
    Primitive::Extrusion {
        profile: regular_polygon(sides.get(), PRISM_RADIUS),
        depth: PRISM_DEPTH,
    }
}

/// Base vertex `i` sits at angle `2πi/n` measured from +Z towards +X so the
/// `(i, i + 1, apex)` winding faces outward.
fn pyramid(sides: SideCount) -> Primitive {
    let base = regular_polygon(sides.get(), PYRAMID_RADIUS)
        .into_iter()
        .map(|p| Point3::new(p.y, 0.0, p.x))
        .collect();
    Primitive::Pyramid {
        base,
        apex: Point3::new(0.0, PYRAMID_HEIGHT, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetLayout;
    use approx::assert_relative_eq;

    fn factory() -> ShapeFactory {
        ShapeFactory::new(GeometryPool::new(), 0x4dd0e1)
    }

    #[test]
    fn test_cube_faces_and_placements() {
        let group = factory().build(ShapeId::Cube);
        assert_eq!(group.len(), 6);

        let opens: Vec<_> = group
            .meshes()
            .iter()
            .map(|mesh| {
                let placement = mesh.placement.unwrap();
                assert_eq!(placement.closed, Vector3::zeros());
                assert_eq!(mesh.position, Vector3::zeros());
                assert!(placement.open.norm() > 0.0);
                assert_relative_eq!(placement.open.norm(), CUBE_SIZE / 2.0);
                assert!(mesh.material.double_sided);
                placement.open
            })
            .collect();

        for (i, a) in opens.iter().enumerate() {
            for b in &opens[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_cube_faces_assemble_a_closed_cube() {
        let group = factory().build(ShapeId::Cube);
        for mesh in group.meshes() {
            let axis = mesh.placement.unwrap().open.normalize();
            for triangle in &mesh.geometry.mesh().triangles {
                for vertex in &triangle.vertices {
                    assert_relative_eq!(vertex.position.coords.dot(&axis), 0.5, epsilon = 1e-6);
                    assert_relative_eq!(vertex.normal, axis, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_primitives_are_single_meshes() {
        let factory = factory();
        for id in [ShapeId::Cuboid, ShapeId::Cylinder, ShapeId::Cone] {
            let group = factory.build(id);
            assert_eq!(group.len(), 1);
            assert!(group.meshes()[0].placement.is_none());
            assert!(!group.meshes()[0].material.double_sided);
        }
    }

    #[test]
    fn test_cuboid_proportions() {
        let group = factory().build(ShapeId::Cuboid);
        match group.meshes()[0].geometry.primitive() {
            Primitive::Box { width, height, depth } => {
                assert_relative_eq!(*width / *depth, 3.0);
                assert_relative_eq!(*height / *depth, 2.0);
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_round_solids() {
        let factory = factory();
        let cylinder = factory.build(ShapeId::Cylinder);
        assert_eq!(
            cylinder.meshes()[0].geometry.primitive(),
            &Primitive::Frustum {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.5,
                segments: 32
            }
        );
        let cone = factory.build(ShapeId::Cone);
        assert_eq!(
            cone.meshes()[0].geometry.primitive(),
            &Primitive::Frustum {
                radius_top: 0.0,
                radius_bottom: 0.5,
                height: 1.5,
                segments: 32
            }
        );
    }

    #[test]
    fn test_prism_and_pyramid_side_counts() {
        let factory = factory();
        for n in 3..=6 {
            let sides = SideCount::new(n).unwrap();

            let prism = factory.build(ShapeId::Prism(sides));
            let primitive = prism.meshes()[0].geometry.primitive();
            assert_eq!(primitive.base_vertex_count(), Some(n as usize));

            let pyramid = factory.build(ShapeId::Pyramid(sides));
            let mesh = &pyramid.meshes()[0];
            assert_eq!(mesh.geometry.primitive().base_vertex_count(), Some(n as usize));
            assert_eq!(mesh.geometry.mesh().triangle_count(), n as usize);
            for triangle in &mesh.geometry.mesh().triangles {
                let normal = triangle.calculate_normal().unwrap();
                assert!(normal.norm() > 0.0);
                // Side faces lean outward and upward.
                assert!(normal.y > 0.0);
            }
        }
    }

    #[test]
    fn test_pyramid_base_follows_polygon_formula() {
        let sides = SideCount::PENTAGON;
        match pyramid(sides) {
            Primitive::Pyramid { base, apex } => {
                assert_eq!(apex, Point3::new(0.0, 1.0, 0.0));
                for (i, vertex) in base.iter().enumerate() {
                    let angle = i as f32 / 5.0 * std::f32::consts::TAU;
                    assert_relative_eq!(vertex.z, angle.cos() * 0.6, epsilon = 1e-6);
                    assert_relative_eq!(vertex.x, angle.sin() * 0.6, epsilon = 1e-6);
                    assert_eq!(vertex.y, 0.0);
                }
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_layout_only_moves_cube_faces() {
        let factory = factory();
        let mut cube = factory.build(ShapeId::Cube);
        assert_eq!(cube.apply_layout(NetLayout::Open), 6);
        let mut prism = factory.build(ShapeId::Prism(SideCount::HEXAGON));
        assert_eq!(prism.apply_layout(NetLayout::Open), 0);
        assert_eq!(prism.meshes()[0].position, Vector3::zeros());
    }
}
