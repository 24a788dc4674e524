//! The shader render pipeline: context, program build, binding, render loop.
//!
//! A [`ShaderPipeline`] owns at most one *run*. Each call to
//! [`ShaderPipeline::run`] first tears down the previous run (cancelling its
//! frame loop before releasing its GL objects) and then walks the stages in
//! order, stopping at the first failure. The failure's text becomes the
//! pipeline's diagnostic.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::geometry::{self, QuadGeometry};
use crate::gl::{DrawingSurface, GlBackend};
use crate::program::CompiledProgram;
use crate::schedule::{FrameScheduler, FrameToken};
use crate::sources::ShaderSourcePair;

/// Result of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The source pair was empty; nothing is rendering.
    Idle,
    /// The render loop is running under this token.
    Rendering(FrameToken),
}

/// GL objects owned by the run currently drawing.
struct ActiveRun<G: GlBackend> {
    token: FrameToken,
    _quad: QuadGeometry<G>,
    _program: CompiledProgram<G>,
}

pub struct ShaderPipeline<S: DrawingSurface, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    config: PipelineConfig,
    diagnostic: String,
    listener: Option<Box<dyn FnMut(&str)>>,
    active: Option<ActiveRun<S::Context>>,
}

impl<S: DrawingSurface, F: FrameScheduler> ShaderPipeline<S, F> {
    pub fn new(surface: S, scheduler: F, config: PipelineConfig) -> Self {
        Self {
            surface,
            scheduler,
            config,
            diagnostic: String::new(),
            listener: None,
            active: None,
        }
    }

    /// Registers a callback receiving every diagnostic update, including the
    /// empty string published when a run starts.
    pub fn set_diagnostic_listener(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Last published diagnostic; empty when the latest run had no error.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Token of the loop currently drawing, if any.
    pub fn active_frame(&self) -> Option<FrameToken> {
        self.active.as_ref().map(|run| run.token)
    }

    /// True while the current run's loop is still being driven by the
    /// scheduler.
    pub fn is_rendering(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| self.scheduler.is_active(run.token))
    }

    /// Replaces whatever is rendering with `sources`.
    pub fn run(&mut self, sources: &ShaderSourcePair) -> Result<RunOutcome, PipelineError> {
        self.stop();
        self.publish(String::new());

        if sources.is_empty() {
            return Ok(RunOutcome::Idle);
        }

        match self.start_run(sources) {
            Ok(run) => {
                let token = run.token;
                self.active = Some(run);
                Ok(RunOutcome::Rendering(token))
            }
            Err(err) => {
                log::warn!("shader pipeline halted: {err}");
                self.publish(err.to_string());
                Err(err)
            }
        }
    }

    /// Publishes a diagnostic that originated outside the pipeline, such as a
    /// failed generation request. Does not touch the render loop.
    pub fn report(&mut self, message: impl Into<String>) {
        self.publish(message.into());
    }

    /// Cancels the render loop and releases the program and geometry.
    pub fn stop(&mut self) {
        if let Some(run) = self.active.take() {
            self.scheduler.cancel(run.token);
            log::debug!("render loop {} cancelled", run.token.raw());
            drop(run);
        }
    }

    fn start_run(
        &mut self,
        sources: &ShaderSourcePair,
    ) -> Result<ActiveRun<S::Context>, PipelineError> {
        let gl = self
            .surface
            .acquire_context(self.config.antialias)
            .ok_or_else(|| {
                log::error!("no WebGL context available for shader canvas");
                PipelineError::ContextUnavailable
            })?;

        let program = CompiledProgram::build(&gl, sources)?;
        let (quad, mut state) = geometry::bind(&gl, &program, &self.config)?;

        let frame_gl = gl.clone();
        let token = self
            .scheduler
            .start(Box::new(move |timestamp_ms: f64| state.draw_frame(&frame_gl, timestamp_ms)))?;
        log::debug!("render loop {} started", token.raw());

        Ok(ActiveRun {
            token,
            _quad: quad,
            _program: program,
        })
    }

    fn publish(&mut self, diagnostic: String) {
        self.diagnostic = diagnostic;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.diagnostic);
        }
    }
}

impl<S: DrawingSurface, F: FrameScheduler> Drop for ShaderPipeline<S, F> {
    fn drop(&mut self) {
        self.stop();
    }
}
