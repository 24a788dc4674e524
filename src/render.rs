use crate::geometry::QUAD_VERTEX_COUNT;
use crate::gl::GlBackend;

/// Per-run inputs of the render loop. Moved into the frame callback and
/// dropped with it; a new run builds a fresh one.
pub struct RenderState<G: GlBackend> {
    time: Option<G::UniformLocation>,
    resolution: Option<G::UniformLocation>,
    clear_color: [f32; 4],
    origin_ms: Option<f64>,
}

impl<G: GlBackend> RenderState<G> {
    pub fn new(
        time: Option<G::UniformLocation>,
        resolution: Option<G::UniformLocation>,
        clear_color: [f32; 4],
    ) -> Self {
        Self {
            time,
            resolution,
            clear_color,
            origin_ms: None,
        }
    }

    /// Seconds since the first frame this state drew.
    fn elapsed_seconds(&mut self, timestamp_ms: f64) -> f32 {
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        ((timestamp_ms - origin).max(0.0) * 0.001) as f32
    }

    /// Draws one frame at `timestamp_ms` (frame-clock milliseconds).
    pub fn draw_frame(&mut self, gl: &G, timestamp_ms: f64) {
        let seconds = self.elapsed_seconds(timestamp_ms);
        let (width, height) = gl.surface_size();

        gl.viewport(0, 0, clamp_i32(width), clamp_i32(height));
        gl.clear_color_buffer(self.clear_color);
        if let Some(resolution) = &self.resolution {
            gl.uniform_2f(resolution, width as f32, height as f32);
        }
        if let Some(time) = &self.time {
            gl.uniform_1f(time, seconds);
        }
        gl.draw_triangle_strip(0, QUAD_VERTEX_COUNT);
    }
}

fn clamp_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
