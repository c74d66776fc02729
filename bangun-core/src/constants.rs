//! Fixed construction parameters for every solid the factory builds.
//!
//! Dimensions are in scene units with Y up. Presentation settings (color,
//! camera, rotation speed) live in [`crate::config`] instead.

// =============================================================================
// CUBE (KUBUS)
// =============================================================================

/// Edge length of the cube; every face is a square of this size.
pub const CUBE_SIZE: f32 = 1.0;

/// Distance a face moves along its outward axis when the net opens.
pub const CUBE_OPEN_OFFSET: f32 = CUBE_SIZE / 2.0;

// =============================================================================
// CUBOID (BALOK)
// =============================================================================

/// Length, height and depth of the cuboid (3:2:1).
pub const CUBOID_DIMENSIONS: [f32; 3] = [1.5, 1.0, 0.5];

// =============================================================================
// ROUND SOLIDS (TABUNG, KERUCUT)
// =============================================================================

pub const CYLINDER_RADIUS: f32 = 0.5;
pub const CYLINDER_HEIGHT: f32 = 1.5;

pub const CONE_RADIUS: f32 = 0.5;
pub const CONE_HEIGHT: f32 = 1.5;

/// Number of segments approximating circular cross-sections.
pub const ROUND_SEGMENTS: u32 = 32;

// =============================================================================
// PRISM (PRISMA) AND PYRAMID (LIMAS)
// =============================================================================

/// Circumradius of the prism's cross-section polygon.
pub const PRISM_RADIUS: f32 = 0.5;

/// Extrusion depth of the prism along +Z.
pub const PRISM_DEPTH: f32 = 1.0;

/// Circumradius of the pyramid's base polygon.
pub const PYRAMID_RADIUS: f32 = 0.6;

/// Height of the pyramid apex above the base centroid.
pub const PYRAMID_HEIGHT: f32 = 1.0;

/// Side counts offered for prisms and pyramids.
pub const MIN_SIDES: u32 = 3;
pub const MAX_SIDES: u32 = 6;

// =============================================================================
// PRECISION
// =============================================================================

/// Below this length a face normal is treated as degenerate.
pub const NORMAL_EPSILON: f32 = 1e-6;
