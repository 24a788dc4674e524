use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::{DemoConfig, GeneratorConfig};
use crate::generate;
use crate::logging;
use crate::pipeline::ShaderPipeline;
use crate::sources::{ShaderSourcePair, EXAMPLE_PROMPT};

use super::frame::AnimationFrameScheduler;
use super::render::CanvasSurface;

/// JS handle for the text-to-shader panel's canvas.
///
/// Every source change restarts the pipeline; the returned string is the
/// diagnostic to display (empty when rendering fine). Calling `free()` from
/// JS stops the render loop.
#[wasm_bindgen]
pub struct ShaderCanvas {
    pipeline: ShaderPipeline<CanvasSurface, AnimationFrameScheduler>,
    sources: ShaderSourcePair,
    generator: GeneratorConfig,
}

#[wasm_bindgen]
impl ShaderCanvas {
    /// `config_json` is an optional `DemoConfig` document.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<ShaderCanvas, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => DemoConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?,
            None => DemoConfig::default(),
        };
        logging::init(config.log_level.into());

        let window = web_sys::window().ok_or("no window")?;
        let surface = CanvasSurface::new(canvas);
        surface.resize(config.canvas.width, config.canvas.height);

        Ok(ShaderCanvas {
            pipeline: ShaderPipeline::new(surface, AnimationFrameScheduler::new(window), config.canvas),
            sources: ShaderSourcePair::default(),
            generator: config.generator,
        })
    }

    /// Replaces the rendered shader. Empty sources stop rendering.
    pub fn set_sources(&mut self, vertex: String, fragment: String) -> String {
        self.apply(ShaderSourcePair::new(vertex, fragment))
    }

    /// Loads the built-in colour gradient example.
    pub fn load_example(&mut self) -> String {
        self.apply(ShaderSourcePair::example())
    }

    /// Stops rendering and forgets the current sources.
    pub fn clear(&mut self) {
        self.apply(ShaderSourcePair::default());
    }

    pub fn diagnostic(&self) -> String {
        self.pipeline.diagnostic().to_string()
    }

    pub fn vertex_source(&self) -> String {
        self.sources.vertex.clone()
    }

    pub fn fragment_source(&self) -> String {
        self.sources.fragment.clone()
    }

    pub fn is_rendering(&self) -> bool {
        self.pipeline.is_rendering()
    }

    /// Calls `callback(message)` on every diagnostic change.
    pub fn on_diagnostic(&mut self, callback: js_sys::Function) {
        self.pipeline.set_diagnostic_listener(move |message: &str| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(message)) {
                log::warn!("diagnostic callback threw: {err:?}");
            }
        });
    }

    /// Changes the canvas pixel size; the running loop picks it up next frame.
    pub fn resize(&self, width: u32, height: u32) {
        self.pipeline.surface().resize(width, height);
    }

    /// Endpoint the page should POST generation requests to.
    pub fn generator_endpoint(&self) -> String {
        self.generator.endpoint.clone()
    }

    /// Feeds the generation service's reply into the canvas.
    ///
    /// On failure the canvas is cleared and the service error becomes the
    /// diagnostic.
    pub fn apply_generation_response(&mut self, ok: bool, body: &str) -> String {
        match generate::decode_response(ok, body) {
            Ok(sources) => self.apply(sources),
            Err(err) => {
                self.apply(ShaderSourcePair::default());
                self.pipeline.report(err.to_string());
                self.diagnostic()
            }
        }
    }
}

impl ShaderCanvas {
    fn apply(&mut self, sources: ShaderSourcePair) -> String {
        // Errors are already published as the diagnostic.
        let _ = self.pipeline.run(&sources);
        self.sources = sources;
        self.diagnostic()
    }
}

/// JSON body for a generation request carrying `prompt`.
#[wasm_bindgen]
pub fn encode_generation_request(prompt: &str) -> Result<String, JsValue> {
    generate::encode_request(prompt).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Prompt text that goes with the built-in example shader.
#[wasm_bindgen]
pub fn example_prompt() -> String {
    EXAMPLE_PROMPT.to_string()
}
