//! Geometry primitives and procedural solid tessellation
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::constants::NORMAL_EPSILON;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn at(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a flat-shaded triangle whose normal follows the winding order.
    pub fn flat(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let normal = face_normal(&p0, &p1, &p2).unwrap_or_else(Vector3::zeros);
        Self::new(
            Vertex::at(p0, normal),
            Vertex::at(p1, normal),
            Vertex::at(p2, normal),
        )
    }

    /// Calculate the face normal from the triangle's vertices
    ///
    /// Returns `None` for degenerate (zero-area) triangles.
    pub fn calculate_normal(&self) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = &self.vertices;
        face_normal(&v0.position, &v1.position, &v2.position)
    }
}

fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Option<Vector3<f32>> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    edge1.cross(&edge2).try_normalize(NORMAL_EPSILON)
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Split a counter-clockwise quad into two triangles sharing one normal.
    fn add_quad(&mut self, corners: [Point3<f32>; 4], normal: Vector3<f32>) {
        let [a, b, c, d] = corners.map(|p| Vertex::at(p, normal));
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Apply a rigid transform to every vertex and normal.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let triangles = self
            .triangles
            .iter()
            .map(|triangle| Triangle {
                vertices: triangle.vertices.map(|v| Vertex {
                    position: matrix.transform_point(&v.position),
                    normal: matrix
                        .transform_vector(&v.normal)
                        .try_normalize(NORMAL_EPSILON)
                        .unwrap_or(v.normal),
                }),
            })
            .collect();
        Self { triangles }
    }

    /// Flatten into interleaved `[px, py, pz, nx, ny, nz]` floats per vertex.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertex_count() * 6);
        for vertex in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            out.extend_from_slice(&[
                vertex.position.x,
                vertex.position.y,
                vertex.position.z,
                vertex.normal.x,
                vertex.normal.y,
                vertex.normal.z,
            ]);
        }
        out
    }

    /// A square plane in the XY plane, centered on the origin, facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let mut mesh = Self::with_capacity(2);
        mesh.add_quad(
            [
                Point3::new(-hw, -hh, 0.0),
                Point3::new(hw, -hh, 0.0),
                Point3::new(hw, hh, 0.0),
                Point3::new(-hw, hh, 0.0),
            ],
            Vector3::z(),
        );
        mesh
    }

    /// An axis-aligned box centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let p = Point3::new;
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_quad(
            [p(-hx, -hy, hz), p(hx, -hy, hz), p(hx, hy, hz), p(-hx, hy, hz)],
            Vector3::z(),
        );
        // Back face
        mesh.add_quad(
            [p(hx, -hy, -hz), p(-hx, -hy, -hz), p(-hx, hy, -hz), p(hx, hy, -hz)],
            -Vector3::z(),
        );
        // Top face
        mesh.add_quad(
            [p(-hx, hy, hz), p(hx, hy, hz), p(hx, hy, -hz), p(-hx, hy, -hz)],
            Vector3::y(),
        );
        // Bottom face
        mesh.add_quad(
            [p(-hx, -hy, -hz), p(hx, -hy, -hz), p(hx, -hy, hz), p(-hx, -hy, hz)],
            -Vector3::y(),
        );
        // Right face
        mesh.add_quad(
            [p(hx, -hy, hz), p(hx, -hy, -hz), p(hx, hy, -hz), p(hx, hy, hz)],
            Vector3::x(),
        );
        // Left face
        mesh.add_quad(
            [p(-hx, -hy, -hz), p(-hx, -hy, hz), p(-hx, hy, hz), p(-hx, hy, -hz)],
            -Vector3::x(),
        );

        mesh
    }

    /// A capped frustum around the Y axis, centered on the origin.
    ///
    /// Equal radii give a cylinder; a zero top radius gives a cone whose
    /// side triangles meet at the apex.
    pub fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let slope = radius_bottom - radius_top;
        let step = std::f32::consts::TAU / segments as f32;

        // Angle 0 sits on +Z and increases towards +X.
        let ring = |radius: f32, y: f32, i: u32| {
            let (sin, cos) = (i as f32 * step).sin_cos();
            Point3::new(radius * sin, y, radius * cos)
        };
        let side_normal = |angle: f32| {
            let (sin, cos) = angle.sin_cos();
            Vector3::new(sin * height, slope, cos * height).normalize()
        };

        let mut mesh = Self::with_capacity(segments as usize * 4);
        let bottom_center = Point3::new(0.0, -half, 0.0);
        let top_center = Point3::new(0.0, half, 0.0);

        for i in 0..segments {
            let j = (i + 1) % segments;
            let (ni, nj) = (side_normal(i as f32 * step), side_normal((i + 1) as f32 * step));
            let (bi, bj) = (ring(radius_bottom, -half, i), ring(radius_bottom, -half, j));

            if radius_top > 0.0 {
                let (ti, tj) = (ring(radius_top, half, i), ring(radius_top, half, j));
                mesh.add_triangle(Triangle::new(Vertex::at(bi, ni), Vertex::at(bj, nj), Vertex::at(ti, ni)));
                mesh.add_triangle(Triangle::new(Vertex::at(bj, nj), Vertex::at(tj, nj), Vertex::at(ti, ni)));

                // Top cap
                let up = Vector3::y();
                mesh.add_triangle(Triangle::new(
                    Vertex::at(top_center, up),
                    Vertex::at(ti, up),
                    Vertex::at(tj, up),
                ));
            } else {
                let apex_normal = side_normal((i as f32 + 0.5) * step);
                mesh.add_triangle(Triangle::new(
                    Vertex::at(bi, ni),
                    Vertex::at(bj, nj),
                    Vertex::at(top_center, apex_normal),
                ));
            }

            if radius_bottom > 0.0 {
                let down = -Vector3::y();
                mesh.add_triangle(Triangle::new(
                    Vertex::at(bottom_center, down),
                    Vertex::at(bj, down),
                    Vertex::at(bi, down),
                ));
            }
        }

        mesh
    }

    /// Linearly extrude a counter-clockwise XY profile from z=0 to z=depth.
    ///
    /// Both caps are fan-triangulated from the first profile vertex, which
    /// is exact for the convex profiles used here.
    pub fn extrude(profile: &[Point2<f32>], depth: f32) -> Self {
        let n = profile.len();
        if n < 3 {
            return Self::new();
        }

        let back = |p: &Point2<f32>| Point3::new(p.x, p.y, 0.0);
        let front = |p: &Point2<f32>| Point3::new(p.x, p.y, depth);
        let mut mesh = Self::with_capacity(2 * (n - 2) + 2 * n);

        for i in 1..n - 1 {
            let (p0, pi, pj) = (&profile[0], &profile[i], &profile[i + 1]);
            mesh.add_triangle(Triangle::flat(front(p0), front(pi), front(pj)));
            mesh.add_triangle(Triangle::flat(back(p0), back(pj), back(pi)));
        }

        for i in 0..n {
            let (pi, pj) = (&profile[i], &profile[(i + 1) % n]);
            let edge = pj - pi;
            let normal = Vector3::new(edge.y, -edge.x, 0.0)
                .try_normalize(NORMAL_EPSILON)
                .unwrap_or_else(Vector3::zeros);
            mesh.add_quad([back(pi), back(pj), front(pj), front(pi)], normal);
        }

        mesh
    }

    /// Side faces of a pyramid: one flat triangle `(i, i + 1, apex)` per
    /// base edge. The base itself is left open.
    pub fn pyramid(base: &[Point3<f32>], apex: Point3<f32>) -> Self {
        let n = base.len();
        let mut mesh = Self::with_capacity(n);
        for i in 0..n {
            mesh.add_triangle(Triangle::flat(base[i], base[(i + 1) % n], apex));
        }
        mesh
    }
}

/// Vertices of a regular polygon: vertex `i` at angle `2πi/sides`.
pub fn regular_polygon(sides: u32, radius: f32) -> Vec<Point2<f32>> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * std::f32::consts::TAU;
            Point2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

/// Construction recipe for a piece of geometry.
///
/// Kept next to the tessellated mesh so callers can inspect what was built
/// without reverse-engineering triangles.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Plane { width: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Frustum { radius_top: f32, radius_bottom: f32, height: f32, segments: u32 },
    Extrusion { profile: Vec<Point2<f32>>, depth: f32 },
    Pyramid { base: Vec<Point3<f32>>, apex: Point3<f32> },
}

impl Primitive {
    pub fn tessellate(&self) -> Mesh {
        match self {
            Primitive::Plane { width, height } => Mesh::plane(*width, *height),
            Primitive::Box { width, height, depth } => Mesh::cuboid(*width, *height, *depth),
            Primitive::Frustum {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => Mesh::frustum(*radius_top, *radius_bottom, *height, *segments),
            Primitive::Extrusion { profile, depth } => Mesh::extrude(profile, *depth),
            Primitive::Pyramid { base, apex } => Mesh::pyramid(base, *apex),
        }
    }

    /// Number of vertices in the base cross-section, for polygonal solids.
    pub fn base_vertex_count(&self) -> Option<usize> {
        match self {
            Primitive::Extrusion { profile, .. } => Some(profile.len()),
            Primitive::Pyramid { base, .. } => Some(base.len()),
            _ => None,
        }
    }
}
