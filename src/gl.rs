//! Backend seam for the handful of GL entry points the shader pipeline uses.
//!
//! The browser implementation lives in `wasm::render`; tests drive the
//! pipeline with a recording backend instead.

use std::fmt;

/// Which programmable stage a shader unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A rendering context able to build and draw a single shader program.
///
/// Handles are owned values; callers release them explicitly through the
/// matching `delete_*` call. Implementations are expected to be cheap to clone
/// (a reference to the underlying context).
pub trait GlBackend: Clone + 'static {
    type Shader: 'static;
    type Program: 'static;
    type Buffer: 'static;
    type UniformLocation: 'static;

    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;
    fn delete_shader(&self, shader: &Self::Shader);

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn program_link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn use_program(&self, program: Option<&Self::Program>);
    fn delete_program(&self, program: &Self::Program);

    fn create_buffer(&self) -> Option<Self::Buffer>;
    /// Binds `buffer` as the array buffer and uploads `data` with static usage.
    fn upload_static_vertices(&self, buffer: &Self::Buffer, data: &[f32]);
    fn delete_buffer(&self, buffer: &Self::Buffer);

    /// `None` when the linked program does not expose `name`.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;
    /// Enables `location` and describes it as tightly packed float tuples.
    fn enable_float_attribute(&self, location: u32, components: i32);
    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Self::UniformLocation>;

    /// Current pixel size of the drawing surface backing this context.
    fn surface_size(&self) -> (u32, u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color_buffer(&self, rgba: [f32; 4]);
    fn uniform_1f(&self, location: &Self::UniformLocation, value: f32);
    fn uniform_2f(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn draw_triangle_strip(&self, first: i32, count: i32);
}

/// Something a rendering context can be requested from.
pub trait DrawingSurface {
    type Context: GlBackend;

    /// Returns `None` when hardware-accelerated rendering is unavailable.
    fn acquire_context(&self, antialias: bool) -> Option<Self::Context>;
}
