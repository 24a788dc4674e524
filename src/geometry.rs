use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::gl::GlBackend;
use crate::program::CompiledProgram;
use crate::render::RenderState;

/// Triangle strip covering the whole clip-space square.
pub const FULLSCREEN_QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
pub const QUAD_VERTEX_COUNT: i32 = 4;

/// Static vertex buffer holding [`FULLSCREEN_QUAD`]; deleted on drop.
pub struct QuadGeometry<G: GlBackend> {
    gl: G,
    buffer: G::Buffer,
}

impl<G: GlBackend> QuadGeometry<G> {
    pub fn upload(gl: &G) -> Result<Self, PipelineError> {
        let buffer = gl.create_buffer().ok_or(PipelineError::BufferCreateFailed)?;
        gl.upload_static_vertices(&buffer, &FULLSCREEN_QUAD);
        Ok(Self {
            gl: gl.clone(),
            buffer,
        })
    }
}

impl<G: GlBackend> Drop for QuadGeometry<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(&self.buffer);
    }
}

/// Uploads the quad and resolves the inputs the render loop feeds each frame.
///
/// The position attribute is required; the time and resolution uniforms are
/// optional and simply skipped when the program does not use them.
pub fn bind<G: GlBackend>(
    gl: &G,
    program: &CompiledProgram<G>,
    config: &PipelineConfig,
) -> Result<(QuadGeometry<G>, RenderState<G>), PipelineError> {
    let quad = QuadGeometry::upload(gl)?;

    let attribute = gl
        .attrib_location(program.handle(), &config.position_attribute)
        .ok_or_else(|| PipelineError::AttributeMissing(config.position_attribute.clone()))?;
    gl.enable_float_attribute(attribute, 2);

    let time = optional_uniform(gl, program, &config.time_uniform);
    let resolution = optional_uniform(gl, program, &config.resolution_uniform);

    Ok((
        quad,
        RenderState::new(time, resolution, config.clear_color),
    ))
}

fn optional_uniform<G: GlBackend>(
    gl: &G,
    program: &CompiledProgram<G>,
    name: &str,
) -> Option<G::UniformLocation> {
    let location = gl.uniform_location(program.handle(), name);
    if location.is_none() {
        log::debug!("uniform '{name}' not used by program; skipping it");
    }
    location
}
