//! Image service port for the external text-to-image backend.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::params::{coerce_number, js_number};
use crate::state::FormState;

/// Body of a generation request.
///
/// `steps` and `scale` hold the coerced field values; NaN is allowed and goes
/// over the wire as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The text prompt, verbatim.
    pub prompt: String,
    /// Number of inference steps.
    #[serde(with = "js_number")]
    pub steps: f64,
    /// Guidance scale.
    #[serde(with = "js_number")]
    pub scale: f64,
}

impl GenerateRequest {
    /// Build a request from the current form fields.
    #[must_use]
    pub fn from_form(state: &FormState) -> Self {
        Self {
            prompt: state.prompt.clone(),
            steps: coerce_number(&state.steps),
            scale: coerce_number(&state.scale),
        }
    }

    /// Whether either parameter failed to coerce.
    #[must_use]
    pub fn has_nan(&self) -> bool {
        self.steps.is_nan() || self.scale.is_nan()
    }
}

/// Body of a successful generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Image location relative to the service's base origin.
    pub url: String,
}

/// Image bytes downloaded from the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedImage {
    /// Raw image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// `Content-Type` reported by the service, if any.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Boxed future type returned by [`ImageService::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerateResponse, ClientError>> + Send + 'a>>;

/// Boxed future type returned by [`ImageService::fetch`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FetchedImage, ClientError>> + Send + 'a>>;

/// Generates images from prompts via the external service.
pub trait ImageService: Send + Sync {
    /// Ask the service to generate an image.
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_>;

    /// Download an image by its fully qualified URL.
    fn fetch(&self, url: &str) -> FetchFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_from_default_form() {
        let request = GenerateRequest::from_form(&FormState::new("a cat", "50", "7.5"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"prompt": "a cat", "steps": 50, "scale": 7.5})
        );
        assert!(!request.has_nan());
    }

    #[test]
    fn request_forwards_nan_as_null() {
        let request = GenerateRequest::from_form(&FormState::new("a cat", "many", "7.5"));
        assert!(request.steps.is_nan());
        assert!(request.has_nan());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"prompt": "a cat", "steps": null, "scale": 7.5})
        );
    }

    #[test]
    fn request_keeps_empty_prompt() {
        let request = GenerateRequest::from_form(&FormState::new("", "50", "7.5"));
        assert_eq!(serde_json::to_value(&request).unwrap()["prompt"], json!(""));
    }

    #[test]
    fn response_requires_url() {
        assert!(serde_json::from_str::<GenerateResponse>(r#"{"path": "/x.png"}"#).is_err());
        assert!(serde_json::from_str::<GenerateResponse>(r#"{"url": 3}"#).is_err());
        let ok: GenerateResponse = serde_json::from_str(r#"{"url": "/x.png"}"#).unwrap();
        assert_eq!(ok.url, "/x.png");
    }

    #[test]
    fn fetched_image_encodes_bytes_as_base64() {
        let image = FetchedImage { data: vec![0x89, 0x50, 0x4E, 0x47], content_type: None };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], json!("iVBORw=="));
        let back: FetchedImage = serde_json::from_value(json).unwrap();
        assert_eq!(back.data, vec![0x89, 0x50, 0x4E, 0x47]);
    }
}
