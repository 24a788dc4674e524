//! Host-side stand-ins for the browser: a GL backend that records every call
//! and a scheduler whose frames are advanced by hand.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use shader_canvas_wasm::error::PipelineError;
use shader_canvas_wasm::gl::{DrawingSurface, GlBackend, ShaderStage};
use shader_canvas_wasm::schedule::{FrameScheduler, FrameTick, FrameToken};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram,
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateBuffer,
    Upload(Vec<f32>),
    DeleteBuffer(u32),
    EnableAttribute { location: u32, components: i32 },
    Viewport(i32, i32, i32, i32),
    Clear([f32; 4]),
    Uniform1f(String, f32),
    Uniform2f(String, f32, f32),
    DrawStrip { first: i32, count: i32 },
}

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: Option<Result<(), String>>,
}

#[derive(Default)]
struct FakeProgram {
    shaders: Vec<u32>,
    linked: Option<Result<(), String>>,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
pub struct GlState {
    pub calls: Vec<Call>,
    pub context_requests: usize,
    pub context_available: bool,
    pub surface_size: (u32, u32),
    pub fail_create_shader: Option<ShaderStage>,
    pub fail_create_program: bool,
    pub fail_create_buffer: bool,
    pub fail_link: Option<String>,
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    buffers: BTreeSet<u32>,
}

/// Recording backend; clones share state.
#[derive(Clone)]
pub struct RecordingGl {
    state: Rc<RefCell<GlState>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        let state = GlState {
            context_available: true,
            surface_size: (512, 512),
            ..GlState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn state(&self) -> std::cell::RefMut<'_, GlState> {
        self.state.borrow_mut()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn draw_count(&self) -> usize {
        self.count(|call| matches!(call, Call::DrawStrip { .. }))
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|call| pred(call)).count()
    }

    pub fn last_viewport(&self) -> Option<(i32, i32, i32, i32)> {
        self.state.borrow().calls.iter().rev().find_map(|call| match call {
            Call::Viewport(x, y, w, h) => Some((*x, *y, *w, *h)),
            _ => None,
        })
    }

    pub fn uniform_1f_values(&self, name: &str) -> Vec<f32> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Uniform1f(n, v) if n == name => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn set_surface_size(&self, width: u32, height: u32) {
        self.state.borrow_mut().surface_size = (width, height);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

/// Minimal stand-in for a GLSL front end: every statement line must end in
/// `;`, `{` or `}`.
fn check_syntax(source: &str) -> Result<(), String> {
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        if !(line.ends_with(';') || line.ends_with('{') || line.ends_with('}')) {
            return Err(format!("ERROR: 0:{}: syntax error", index + 1));
        }
    }
    Ok(())
}

/// Names declared as `<qualifier> <type> <name>;`.
fn declared(source: &str, qualifiers: &[&str]) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let mut words = line.trim().trim_end_matches(';').split_whitespace();
            let qualifier = words.next()?;
            if !qualifiers.contains(&qualifier) {
                return None;
            }
            words.next()?;
            words.next().map(str::to_string)
        })
        .collect()
}

impl GlBackend for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        self.record(Call::CreateShader(stage));
        if self.state.borrow().fail_create_shader == Some(stage) {
            return None;
        }
        let id = self.next_id();
        self.state.borrow_mut().shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: None,
            },
        );
        Some(id)
    }

    fn shader_source(&self, shader: &u32, source: &str) {
        if let Some(fake) = self.state.borrow_mut().shaders.get_mut(shader) {
            fake.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: &u32) {
        self.record(Call::CompileShader(*shader));
        if let Some(fake) = self.state.borrow_mut().shaders.get_mut(shader) {
            fake.compiled = Some(check_syntax(&fake.source));
        }
    }

    fn shader_compile_status(&self, shader: &u32) -> bool {
        matches!(
            self.state.borrow().shaders.get(shader).and_then(|s| s.compiled.as_ref()),
            Some(Ok(()))
        )
    }

    fn shader_info_log(&self, shader: &u32) -> Option<String> {
        match self.state.borrow().shaders.get(shader)?.compiled.as_ref()? {
            Err(log) => Some(log.clone()),
            Ok(()) => Some(String::new()),
        }
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader(*shader));
        self.state.borrow_mut().shaders.remove(shader);
    }

    fn create_program(&self) -> Option<u32> {
        self.record(Call::CreateProgram);
        if self.state.borrow().fail_create_program {
            return None;
        }
        let id = self.next_id();
        self.state.borrow_mut().programs.insert(id, FakeProgram::default());
        Some(id)
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        if let Some(fake) = self.state.borrow_mut().programs.get_mut(program) {
            fake.shaders.push(*shader);
        }
    }

    fn link_program(&self, program: &u32) {
        self.record(Call::LinkProgram(*program));
        let mut state = self.state.borrow_mut();
        let failure = state.fail_link.clone();
        let mut attributes = Vec::new();
        let mut uniforms = Vec::new();
        let shaders = state
            .programs
            .get(program)
            .map(|p| p.shaders.clone())
            .unwrap_or_default();
        for id in shaders {
            if let Some(shader) = state.shaders.get(&id) {
                if shader.stage == ShaderStage::Vertex {
                    attributes.extend(declared(&shader.source, &["attribute", "in"]));
                }
                uniforms.extend(declared(&shader.source, &["uniform"]));
            }
        }
        if let Some(fake) = state.programs.get_mut(program) {
            fake.linked = Some(match failure {
                Some(log) => Err(log),
                None => Ok(()),
            });
            fake.attributes = attributes;
            fake.uniforms = uniforms;
        }
    }

    fn program_link_status(&self, program: &u32) -> bool {
        matches!(
            self.state.borrow().programs.get(program).and_then(|p| p.linked.as_ref()),
            Some(Ok(()))
        )
    }

    fn program_info_log(&self, program: &u32) -> Option<String> {
        match self.state.borrow().programs.get(program)?.linked.as_ref()? {
            Err(log) => Some(log.clone()),
            Ok(()) => None,
        }
    }

    fn use_program(&self, program: Option<&u32>) {
        self.record(Call::UseProgram(program.copied()));
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram(*program));
        self.state.borrow_mut().programs.remove(program);
    }

    fn create_buffer(&self) -> Option<u32> {
        self.record(Call::CreateBuffer);
        if self.state.borrow().fail_create_buffer {
            return None;
        }
        let id = self.next_id();
        self.state.borrow_mut().buffers.insert(id);
        Some(id)
    }

    fn upload_static_vertices(&self, _buffer: &u32, data: &[f32]) {
        self.record(Call::Upload(data.to_vec()));
    }

    fn delete_buffer(&self, buffer: &u32) {
        self.record(Call::DeleteBuffer(*buffer));
        self.state.borrow_mut().buffers.remove(buffer);
    }

    fn attrib_location(&self, program: &u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let position = state
            .programs
            .get(program)?
            .attributes
            .iter()
            .position(|attribute| attribute == name)?;
        Some(position as u32)
    }

    fn enable_float_attribute(&self, location: u32, components: i32) {
        self.record(Call::EnableAttribute {
            location,
            components,
        });
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let program = state.programs.get(program)?;
        program
            .uniforms
            .iter()
            .any(|uniform| uniform == name)
            .then(|| name.to_string())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.state.borrow().surface_size
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color_buffer(&self, rgba: [f32; 4]) {
        self.record(Call::Clear(rgba));
    }

    fn uniform_1f(&self, location: &String, value: f32) {
        self.record(Call::Uniform1f(location.clone(), value));
    }

    fn uniform_2f(&self, location: &String, x: f32, y: f32) {
        self.record(Call::Uniform2f(location.clone(), x, y));
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.record(Call::DrawStrip { first, count });
    }
}

/// Surface handing out the shared [`RecordingGl`].
#[derive(Clone)]
pub struct FakeSurface {
    pub gl: RecordingGl,
}

impl DrawingSurface for FakeSurface {
    type Context = RecordingGl;

    fn acquire_context(&self, _antialias: bool) -> Option<RecordingGl> {
        let mut state = self.gl.state();
        state.context_requests += 1;
        state.context_available.then(|| self.gl.clone())
    }
}

#[derive(Default)]
struct SchedulerState {
    next: u64,
    now_ms: f64,
    ticks: BTreeMap<FrameToken, FrameTick>,
    started: Vec<FrameToken>,
    cancelled: Vec<FrameToken>,
    refuse_start: Option<String>,
}

/// Frame scheduler advanced explicitly by the test.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn active(&self) -> Vec<FrameToken> {
        self.state.borrow().ticks.keys().copied().collect()
    }

    pub fn started(&self) -> Vec<FrameToken> {
        self.state.borrow().started.clone()
    }

    pub fn cancelled(&self) -> Vec<FrameToken> {
        self.state.borrow().cancelled.clone()
    }

    /// Makes every later `start` fail with `reason`.
    pub fn refuse_start(&self, reason: &str) {
        self.state.borrow_mut().refuse_start = Some(reason.to_string());
    }

    /// Stops a loop the way a failed reschedule does: no cancel, it just
    /// never runs again.
    pub fn halt(&self, token: FrameToken) {
        self.state.borrow_mut().ticks.remove(&token);
    }

    /// Presents `frames` frames, `frame_ms` apart, to every active loop.
    pub fn advance(&self, frames: usize, frame_ms: f64) {
        for _ in 0..frames {
            let now = {
                let mut state = self.state.borrow_mut();
                state.now_ms += frame_ms;
                state.now_ms
            };
            for token in self.active() {
                let tick = self.state.borrow_mut().ticks.remove(&token);
                if let Some(mut tick) = tick {
                    tick(now);
                    self.state.borrow_mut().ticks.insert(token, tick);
                }
            }
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&self, tick: FrameTick) -> Result<FrameToken, PipelineError> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.refuse_start.clone() {
            return Err(PipelineError::FrameScheduleFailed(reason));
        }
        state.next += 1;
        let token = FrameToken::new(state.next);
        state.ticks.insert(token, tick);
        state.started.push(token);
        Ok(token)
    }

    fn cancel(&self, token: FrameToken) {
        let mut state = self.state.borrow_mut();
        if state.ticks.remove(&token).is_some() {
            state.cancelled.push(token);
        }
    }

    fn is_active(&self, token: FrameToken) -> bool {
        self.state.borrow().ticks.contains_key(&token)
    }
}
