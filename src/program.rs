//! Compile and link stage: turns a source pair into a live program object.

use crate::error::PipelineError;
use crate::gl::{GlBackend, ShaderStage};
use crate::sources::ShaderSourcePair;

const UNKNOWN_ERROR: &str = "Unknown error";

/// A compiled shader unit, released when dropped.
struct ShaderUnit<G: GlBackend> {
    gl: G,
    handle: G::Shader,
}

impl<G: GlBackend> ShaderUnit<G> {
    fn compile(gl: &G, stage: ShaderStage, source: &str) -> Result<Self, PipelineError> {
        let handle = gl
            .create_shader(stage)
            .ok_or(PipelineError::ShaderCreateFailed(stage))?;
        let unit = ShaderUnit {
            gl: gl.clone(),
            handle,
        };
        gl.shader_source(&unit.handle, source);
        gl.compile_shader(&unit.handle);
        if !gl.shader_compile_status(&unit.handle) {
            // `unit` drops here and deletes the failed shader.
            return Err(PipelineError::ShaderCompileFailed {
                stage,
                log: info_log(gl.shader_info_log(&unit.handle)),
            });
        }
        Ok(unit)
    }
}

impl<G: GlBackend> Drop for ShaderUnit<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(&self.handle);
    }
}

/// Linked program plus the two units it was built from.
///
/// Owns all three GL objects; dropping it releases them.
pub struct CompiledProgram<G: GlBackend> {
    gl: G,
    program: G::Program,
    _vertex: ShaderUnit<G>,
    _fragment: ShaderUnit<G>,
}

impl<G: GlBackend> CompiledProgram<G> {
    /// Compiles both stages, links them and makes the program current.
    ///
    /// Stops at the first failure; nothing compiled so far outlives the error.
    pub fn build(gl: &G, sources: &ShaderSourcePair) -> Result<Self, PipelineError> {
        let vertex = ShaderUnit::compile(gl, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = ShaderUnit::compile(gl, ShaderStage::Fragment, &sources.fragment)?;

        let program = gl.create_program().ok_or(PipelineError::ProgramCreateFailed)?;
        gl.attach_shader(&program, &vertex.handle);
        gl.attach_shader(&program, &fragment.handle);
        gl.link_program(&program);
        if !gl.program_link_status(&program) {
            let log = info_log(gl.program_info_log(&program));
            gl.delete_program(&program);
            return Err(PipelineError::ProgramLinkFailed(log));
        }
        gl.use_program(Some(&program));
        log::info!("shader program linked");

        Ok(Self {
            gl: gl.clone(),
            program,
            _vertex: vertex,
            _fragment: fragment,
        })
    }

    pub fn handle(&self) -> &G::Program {
        &self.program
    }
}

impl<G: GlBackend> Drop for CompiledProgram<G> {
    fn drop(&mut self) {
        self.gl.use_program(None);
        self.gl.delete_program(&self.program);
    }
}

fn info_log(log: Option<String>) -> String {
    match log {
        Some(log) if !log.trim().is_empty() => log,
        _ => UNKNOWN_ERROR.to_string(),
    }
}
