use crate::gl::ShaderStage;

/// Terminal failures of a single pipeline run.
///
/// The `Display` text of each variant is the diagnostic shown to the user
/// verbatim, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("WebGL not supported")]
    ContextUnavailable,
    #[error("Failed to create {0} shader")]
    ShaderCreateFailed(ShaderStage),
    #[error("Shader compilation failed: {log}")]
    ShaderCompileFailed { stage: ShaderStage, log: String },
    #[error("Failed to create shader program")]
    ProgramCreateFailed,
    #[error("Shader program linking failed: {0}")]
    ProgramLinkFailed(String),
    #[error("Failed to create vertex buffer")]
    BufferCreateFailed,
    #[error("Attribute '{0}' not found in vertex shader")]
    AttributeMissing(String),
    #[error("Failed to schedule animation frame: {0}")]
    FrameScheduleFailed(String),
}
