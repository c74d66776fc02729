//! Bangun Core Library - Shape construction and scene state
//!
//! This library provides the platform-independent part of the viewer:
//! procedural solid construction, the cube net toggle, the scene and menu
//! controllers, and the geometry resource pool the front ends release GPU
//! buffers against.

pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod menu;
pub mod net;
pub mod projection;
pub mod resource;
pub mod scene;
pub mod shape;

// Re-export commonly used types
pub use config::{CameraConfig, ViewerConfig};
pub use error::{Result, ShapeError};
pub use factory::ShapeFactory;
pub use geometry::{Mesh, Primitive, Triangle, Vertex};
pub use menu::{Category, CategoryTarget, MenuController, MenuOutcome, Submenu, SubmenuEntry};
pub use net::{FacePlacement, NetLayout};
pub use projection::Camera;
pub use resource::{Geometry, GeometryId, GeometryPool};
pub use scene::{lambert, Material, SceneController, SceneMesh, ShapeGroup};
pub use shape::{parse_tag, CompositeKind, ShapeId, SideCount, Variant};
