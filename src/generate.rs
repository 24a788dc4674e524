//! Request/response contract of the remote text-to-shader service.
//!
//! The HTTP round trip itself is made by the page; this module only shapes
//! the request body and interprets what comes back.

use serde::{Deserialize, Serialize};

use crate::sources::ShaderSourcePair;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The service reported an error message of its own.
    #[error("{0}")]
    Service(String),
    /// Non-success status without a usable error message.
    #[error("Failed to generate shader")]
    Rejected,
    #[error("invalid response from shader service: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode shader request: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedShader {
    vertex_shader_code: String,
    fragment_shader_code: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: Option<String>,
}

/// JSON body to POST to the generation endpoint.
pub fn encode_request(prompt: &str) -> Result<String, GenerateError> {
    serde_json::to_string(&GenerateRequest { prompt }).map_err(GenerateError::Encode)
}

/// Interprets a response body; `ok` is the HTTP success flag.
pub fn decode_response(ok: bool, body: &str) -> Result<ShaderSourcePair, GenerateError> {
    if !ok {
        return match serde_json::from_str::<ServiceError>(body) {
            Ok(ServiceError {
                error: Some(message),
            }) if !message.is_empty() => Err(GenerateError::Service(message)),
            _ => Err(GenerateError::Rejected),
        };
    }
    let shader: GeneratedShader = serde_json::from_str(body).map_err(GenerateError::Decode)?;
    Ok(ShaderSourcePair::new(
        shader.vertex_shader_code,
        shader.fragment_shader_code,
    ))
}
