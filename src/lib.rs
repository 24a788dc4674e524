//! WebAssembly side of the calculator / text-to-shader demo page.
//!
//! The shader pipeline is generic over [`gl::GlBackend`] and
//! [`schedule::FrameScheduler`]; the browser bindings for both live in the
//! wasm32-only `wasm` module.

pub mod calculator;
pub mod config;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod gl;
pub mod logging;
pub mod pipeline;
pub mod program;
pub mod render;
pub mod schedule;
pub mod sources;

pub use calculator::Calculator;
pub use config::{DemoConfig, PipelineConfig};
pub use error::PipelineError;
pub use pipeline::{RunOutcome, ShaderPipeline};
pub use sources::ShaderSourcePair;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod canvas;
    mod frame;
    mod render;

    pub use canvas::{encode_generation_request, example_prompt, ShaderCanvas};
    pub use frame::AnimationFrameScheduler;
    pub use render::{CanvasSurface, WebGlContext};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        crate::logging::init(crate::config::LogLevel::default().into());
        log::debug!("shader_canvas_wasm loaded");
        Ok(())
    }
}
