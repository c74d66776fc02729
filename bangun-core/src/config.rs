//! Viewer presentation settings, loadable from JSON.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Presentation settings shared by the web and terminal viewers.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Flat material color as `0xRRGGBB`.
    pub color: u32,
    /// Rotation about Y applied to the shape every frame (radians).
    pub rotation_step: f32,
    pub camera: CameraConfig,
    /// Position of the directional light; it shines towards the origin.
    pub light_direction: [f32; 3],
    /// Light added to every face regardless of orientation, `0.0..=1.0`.
    /// Zero leaves faces turned away from the light black.
    pub ambient: f32,
    /// Canvas height in CSS pixels (the width follows the container).
    pub canvas_height: u32,
    /// Frame rate of the terminal loop.
    pub target_fps: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            color: 0x4dd0e1,
            rotation_step: 0.01,
            camera: CameraConfig::default(),
            light_direction: [5.0, 5.0, 5.0],
            ambient: 0.0,
            canvas_height: 500,
            target_fps: 30,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Color split into linear `[r, g, b]` channels in `0.0..=1.0`.
    pub fn color_rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }

    /// Unit vector pointing from the origin towards the light.
    ///
    /// A zero vector falls back to straight down the camera axis.
    pub fn light_vector(&self) -> Vector3<f32> {
        let [x, y, z] = self.light_direction;
        Vector3::new(x, y, z)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z)
    }
}

/// Perspective camera placed on +Z looking at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            distance: 5.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

pub fn hex_to_rgb(color: u32) -> [f32; 3] {
    let channel = |shift: u32| ((color >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}
