//! WebGL2 renderer for the scene's shape group
//!
//! Every `Geometry` is uploaded once into its own vertex array, keyed by its
//! pool id. Ids the pool reports as released have their buffers deleted
//! before the next draw.
use std::collections::HashMap;

use bangun_core::{Camera, GeometryId, GeometryPool, Mesh, SceneMesh, ShapeGroup, ViewerConfig};
use nalgebra::{Matrix4, Vector3};
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

use crate::error::{Result, ViewerError};

const MESH_VERT: &str = r#"#version 300 es
uniform mat4 u_model;
uniform mat4 u_view_proj;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

out vec3 v_normal;

void main() {
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_view_proj * u_model * vec4(a_position, 1.0);
}
"#;

const MESH_FRAG: &str = r#"#version 300 es
precision mediump float;

uniform vec3 u_color;
uniform vec3 u_light;
uniform float u_ambient;
uniform bool u_double_sided;

in vec3 v_normal;

out vec4 frag_color;

void main() {
    vec3 normal = normalize(v_normal);
    if (u_double_sided && !gl_FrontFacing) {
        normal = -normal;
    }
    float intensity = min(u_ambient + max(dot(normal, u_light), 0.0), 1.0);
    frag_color = vec4(u_color * intensity, 1.0);
}
"#;

/// position (3) + normal (3)
const FLOATS_PER_VERTEX: i32 = 6;
const STRIDE: i32 = FLOATS_PER_VERTEX * 4;

struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    vertex_count: i32,
}

struct Uniforms {
    model: Option<WebGlUniformLocation>,
    view_proj: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    light: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    double_sided: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &Gl, program: &WebGlProgram) -> Self {
        Self {
            model: gl.get_uniform_location(program, "u_model"),
            view_proj: gl.get_uniform_location(program, "u_view_proj"),
            color: gl.get_uniform_location(program, "u_color"),
            light: gl.get_uniform_location(program, "u_light"),
            ambient: gl.get_uniform_location(program, "u_ambient"),
            double_sided: gl.get_uniform_location(program, "u_double_sided"),
        }
    }
}

pub struct WebGlRenderer {
    gl: Gl,
    program: WebGlProgram,
    uniforms: Uniforms,
    buffers: HashMap<GeometryId, GpuMesh>,
    camera: Camera,
    light: Vector3<f32>,
    ambient: f32,
}

impl WebGlRenderer {
    pub fn new(gl: Gl, config: &ViewerConfig, width: u32, height: u32) -> Result<Self> {
        let program = compile_program(&gl, MESH_VERT, MESH_FRAG)?;
        let uniforms = Uniforms::locate(&gl, &program);

        gl.enable(Gl::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);

        let mut renderer = Self {
            gl,
            program,
            uniforms,
            buffers: HashMap::new(),
            camera: Camera::from_config(&config.camera, 1.0),
            light: config.light_vector(),
            ambient: config.ambient,
        };
        renderer.resize(width, height);
        Ok(renderer)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width as f32 / height.max(1) as f32);
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Delete the GPU buffers of every geometry the pool has released.
    pub fn release(&mut self, pool: &GeometryPool) {
        for id in pool.drain_released() {
            if let Some(gpu) = self.buffers.remove(&id) {
                self.gl.delete_buffer(Some(&gpu.vbo));
                self.gl.delete_vertex_array(Some(&gpu.vao));
                tracing::trace!(%id, "gpu buffers deleted");
            }
        }
    }

    pub fn render(&mut self, group: Option<&ShapeGroup>) -> Result<()> {
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let Some(group) = group else {
            return Ok(());
        };

        self.gl.use_program(Some(&self.program));
        let view_proj = self.camera.view_projection();
        self.gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.view_proj.as_ref(),
            false,
            view_proj.as_slice(),
        );
        self.gl.uniform3f(self.uniforms.light.as_ref(), self.light.x, self.light.y, self.light.z);
        self.gl.uniform1f(self.uniforms.ambient.as_ref(), self.ambient);

        for mesh in group.meshes() {
            self.draw_mesh(mesh, &group.model_matrix(mesh))?;
        }

        self.gl.bind_vertex_array(None);
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &SceneMesh, model: &Matrix4<f32>) -> Result<()> {
        let id = mesh.geometry.id();
        if !self.buffers.contains_key(&id) {
            let gpu = upload(&self.gl, mesh.geometry.mesh())?;
            self.buffers.insert(id, gpu);
        }
        let Some(gpu) = self.buffers.get(&id) else {
            return Ok(());
        };

        let material = &mesh.material;
        if material.double_sided {
            self.gl.disable(Gl::CULL_FACE);
        } else {
            self.gl.enable(Gl::CULL_FACE);
        }

        let [r, g, b] = material.color;
        self.gl.uniform_matrix4fv_with_f32_array(self.uniforms.model.as_ref(), false, model.as_slice());
        self.gl.uniform3f(self.uniforms.color.as_ref(), r, g, b);
        self.gl.uniform1i(self.uniforms.double_sided.as_ref(), i32::from(material.double_sided));

        self.gl.bind_vertex_array(Some(&gpu.vao));
        self.gl.draw_arrays(Gl::TRIANGLES, 0, gpu.vertex_count);
        Ok(())
    }
}

impl Drop for WebGlRenderer {
    fn drop(&mut self) {
        for (_, gpu) in self.buffers.drain() {
            self.gl.delete_buffer(Some(&gpu.vbo));
            self.gl.delete_vertex_array(Some(&gpu.vao));
        }
        self.gl.delete_program(Some(&self.program));
    }
}

fn upload(gl: &Gl, mesh: &Mesh) -> Result<GpuMesh> {
    let bytes: Vec<u8> = mesh
        .interleaved()
        .iter()
        .flat_map(|value| value.to_le_bytes())
        .collect();

    let vao = gl.create_vertex_array().ok_or(ViewerError::Create("vertex array"))?;
    let vbo = gl.create_buffer().ok_or(ViewerError::Create("vertex buffer"))?;

    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vbo));
    gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, &bytes, Gl::STATIC_DRAW);

    // position: location 0
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, STRIDE, 0);

    // normal: location 1
    gl.enable_vertex_attrib_array(1);
    gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, STRIDE, 3 * 4);

    gl.bind_vertex_array(None);

    Ok(GpuMesh {
        vao,
        vbo,
        vertex_count: mesh.vertex_count() as i32,
    })
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or(ViewerError::Create("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        tracing::error!("shader error: {log}");
        Err(ViewerError::ShaderCompile(log))
    }
}

fn compile_program(gl: &Gl, vert_src: &str, frag_src: &str) -> Result<WebGlProgram> {
    let vert = compile_shader(gl, Gl::VERTEX_SHADER, vert_src)?;
    let frag = compile_shader(gl, Gl::FRAGMENT_SHADER, frag_src)?;
    let program = gl.create_program().ok_or(ViewerError::Create("program"))?;

    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        tracing::error!("program link error: {log}");
        Err(ViewerError::ProgramLink(log))
    }
}
