//! ASCII rasterizer for terminal rendering
use bangun_core::{lambert, Camera, SceneMesh, ShapeGroup, Triangle};
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A character cell: glyph plus the brightness it was shaded with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    brightness: f32,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        brightness: 0.0,
    };
}

/// ASCII renderer that converts shape groups to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    /// Unit vector from the origin towards the directional light.
    light: Vector3<f32>,
    ambient: f32,
    depth_buffer: Vec<f32>,
    cell_buffer: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, light: Vector3<f32>, ambient: f32) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            light,
            ambient,
            depth_buffer: vec![f32::INFINITY; size],
            cell_buffer: vec![Cell::EMPTY; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.light, self.ambient);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cell_buffer.fill(Cell::EMPTY);
    }

    pub fn render_group(&mut self, group: &ShapeGroup, camera: &Camera) {
        for mesh in group.meshes() {
            let model = group.model_matrix(mesh);
            self.render_mesh(mesh, &model, camera);
        }
    }

    fn render_mesh(&mut self, mesh: &SceneMesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for triangle in &mesh.geometry.mesh().triangles {
            self.render_triangle(triangle, mesh.material.double_sided, model_matrix, camera);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        double_sided: bool,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Screen-space winding: counter-clockwise in world space turns
        // clockwise once y points down.
        let [a, b, c] = screen_coords;
        let area = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
        let front_facing = area < 0.0;
        if !front_facing && !double_sided {
            return;
        }

        // Lambert shading with the face normal in world space
        let Some(normal) = triangle.calculate_normal() else {
            return;
        };
        let mut normal = model_matrix.transform_vector(&normal);
        if !front_facing {
            normal = -normal;
        }
        let brightness = lambert(&normal, &self.light, self.ambient);

        self.rasterize_triangle(&screen_coords, Cell { glyph: glyph_for(brightness), brightness });
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cell_buffer[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    /// Glyph currently stored at a cell, mainly for inspection in tests.
    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cell_buffer[y * self.width + x].glyph)
    }

    pub fn draw<W: Write>(&self, writer: &mut W, tint: [f32; 3]) -> std::io::Result<()> {
        for row in self.cell_buffer.chunks(self.width.max(1)) {
            for cell in row {
                if cell.glyph == ' ' {
                    writer.queue(Print(' '))?;
                    continue;
                }
                // Dim the material color by the Lambert term
                let shade = |channel: f32| (channel * (0.25 + 0.75 * cell.brightness) * 255.0) as u8;
                let color = Color::Rgb {
                    r: shade(tint[0]),
                    g: shade(tint[1]),
                    b: shade(tint[2]),
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map brightness to character; lit surfaces never fall back to blank.
fn glyph_for(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = ((brightness * last as f32) as usize).clamp(1, last);
    LUMINOSITY_RAMP[index]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bangun_core::{GeometryPool, SceneController, ShapeId, ViewerConfig};

    fn render(id: ShapeId) -> AsciiRenderer {
        let config = ViewerConfig::default();
        let mut scene = SceneController::new(GeometryPool::new(), &config);
        scene.select(id);
        let camera = Camera::from_config(&config.camera, 80.0 / (40.0 * 2.0));
        let mut renderer = AsciiRenderer::new(80, 40, config.light_vector(), config.ambient);
        if let Some(group) = scene.group() {
            renderer.render_group(group, &camera);
        }
        renderer
    }

    #[test]
    fn test_shape_covers_screen_center() {
        // One row above center: pyramids sit on the y = 0 plane.
        for id in ShapeId::ALL {
            let renderer = render(id);
            assert_ne!(renderer.glyph_at(40, 19), Some(' '), "{id} not drawn");
        }
    }

    #[test]
    fn test_corners_stay_empty() {
        let renderer = render(ShapeId::Cube);
        assert_eq!(renderer.glyph_at(0, 0), Some(' '));
        assert_eq!(renderer.glyph_at(79, 39), Some(' '));
        assert_eq!(renderer.glyph_at(80, 0), None);
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = render(ShapeId::Cuboid);
        renderer.clear();
        assert_eq!(renderer.glyph_at(40, 19), Some(' '));
    }

    #[test]
    fn test_draw_emits_one_line_per_row() {
        let renderer = render(ShapeId::Cone);
        let mut out = Vec::new();
        renderer.draw(&mut out, [0.3, 0.8, 0.9]).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 40);
    }

    #[test]
    fn test_glyph_ramp() {
        assert_eq!(glyph_for(0.0), '.');
        assert_eq!(glyph_for(1.0), '@');
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
