/// Vertex shader of the built-in example: passes a normalized uv through.
pub const EXAMPLE_VERTEX_SHADER: &str = r#"
attribute vec2 a_position;
varying vec2 v_uv;
void main() {
  v_uv = a_position * 0.5 + 0.5;
  gl_Position = vec4(a_position, 0.0, 1.0);
}"#;

/// Fragment shader of the built-in example: a time-varying colour gradient.
pub const EXAMPLE_FRAGMENT_SHADER: &str = r#"
precision mediump float;
varying vec2 v_uv;
uniform float u_time;
uniform vec2 u_resolution;
void main() {
  vec2 uv = v_uv;
  vec3 color = 0.5 + 0.5 * sin(u_time + uv.xyx + vec3(0,2,4));
  gl_FragColor = vec4(color, 1.0);
}"#;

/// Prompt shown alongside the example pair.
pub const EXAMPLE_PROMPT: &str = "Simple animated color shader";

/// A vertex/fragment source pair. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSourcePair {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSourcePair {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn example() -> Self {
        Self::new(EXAMPLE_VERTEX_SHADER, EXAMPLE_FRAGMENT_SHADER)
    }

    /// True when there is nothing to render (either stage missing).
    pub fn is_empty(&self) -> bool {
        self.vertex.is_empty() || self.fragment.is_empty()
    }
}
