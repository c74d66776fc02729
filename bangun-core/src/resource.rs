//! Geometry resource tracking.
//!
//! Every [`Geometry`] is registered in a [`GeometryPool`] when it is created
//! and released from it when dropped. Renderers key their GPU buffers by
//! [`GeometryId`] and drain [`GeometryPool::drain_released`] to free the
//! buffers of geometry that no longer exists.
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};

use nalgebra::Matrix4;

use crate::geometry::{Mesh, Primitive};

/// Stable identifier of one registered geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geometry#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct PoolState {
    next_id: u64,
    live: BTreeSet<GeometryId>,
    released: Vec<GeometryId>,
}

impl PoolState {
    fn acquire(&mut self) -> GeometryId {
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    fn release(&mut self, id: GeometryId) {
        if self.live.remove(&id) {
            self.released.push(id);
        }
    }
}

/// Single-threaded registry of live geometry.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct GeometryPool {
    state: Rc<RefCell<PoolState>>,
}

impl GeometryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellate `primitive` and register the result.
    pub fn create(&self, primitive: Primitive) -> Geometry {
        let mesh = primitive.tessellate();
        self.register(primitive, mesh)
    }

    /// Tessellate `primitive`, move it into place with `placement`, and
    /// register the result.
    pub fn create_placed(&self, primitive: Primitive, placement: &Matrix4<f32>) -> Geometry {
        let mesh = primitive.tessellate().transformed(placement);
        self.register(primitive, mesh)
    }

    fn register(&self, primitive: Primitive, mesh: Mesh) -> Geometry {
        let id = self.state.borrow_mut().acquire();
        tracing::trace!(%id, triangles = mesh.triangle_count(), "geometry registered");
        Geometry {
            id,
            primitive,
            mesh,
            pool: Rc::downgrade(&self.state),
        }
    }

    /// Number of geometries created from this pool and not yet dropped.
    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn is_live(&self, id: GeometryId) -> bool {
        self.state.borrow().live.contains(&id)
    }

    /// Take the ids released since the last call.
    pub fn drain_released(&self) -> Vec<GeometryId> {
        std::mem::take(&mut self.state.borrow_mut().released)
    }
}

/// Tessellated geometry owned by exactly one mesh.
///
/// Dropping it releases its id from the pool it came from.
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    primitive: Primitive,
    mesh: Mesh,
    pool: Weak<RefCell<PoolState>>,
}

impl Geometry {
    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        if let Some(state) = self.pool.upgrade() {
            state.borrow_mut().release(self.id);
            tracing::trace!(id = %self.id, "geometry released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane() -> Primitive {
        Primitive::Plane {
            width: 1.0,
            height: 1.0,
        }
    }

    #[test]
    fn test_drop_releases_geometry() {
        let pool = GeometryPool::new();
        let geometry = pool.create(plane());
        let id = geometry.id();
        assert_eq!(pool.live_count(), 1);
        assert!(pool.is_live(id));

        drop(geometry);
        assert_eq!(pool.live_count(), 0);
        assert!(!pool.is_live(id));
        assert_eq!(pool.drain_released(), vec![id]);
        assert!(pool.drain_released().is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let pool = GeometryPool::new();
        let first = pool.create(plane()).id();
        let second = pool.create(plane()).id();
        assert_ne!(first, second);
        assert_eq!(pool.drain_released(), vec![first, second]);
    }

    #[test]
    fn test_ids_display_in_creation_order() {
        let pool = GeometryPool::new();
        let first = pool.create(plane());
        let second = pool.create(plane());
        assert_eq!(first.id().to_string(), "geometry#0");
        assert_eq!(second.id().to_string(), "geometry#1");
        assert!(first.id() < second.id());
    }

    #[test]
    fn test_geometry_outliving_pool() {
        let pool = GeometryPool::new();
        let geometry = pool.create(plane());
        drop(pool);
        assert_eq!(geometry.mesh().triangle_count(), 2);
        drop(geometry);
    }

    #[test]
    fn test_placed_geometry_is_transformed() {
        let pool = GeometryPool::new();
        let shift = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, 0.5));
        let geometry = pool.create_placed(plane(), &shift);
        for vertex in geometry.mesh().triangles.iter().flat_map(|t| t.vertices.iter()) {
            assert_eq!(vertex.position.z, 0.5);
        }
        assert_eq!(geometry.primitive(), &plane());
    }
}
