//! Recording adapter for the `ImageService` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_service::{FetchFuture, GenerateFuture, GenerateRequest, ImageService};

/// Port name used in cassettes.
pub const PORT: &str = "image_service";

/// Records service interactions while delegating to an inner implementation.
pub struct RecordingImageService {
    inner: Box<dyn ImageService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageService {
    /// Creates a new recording service wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageService for RecordingImageService {
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate(&request_clone).await;
            record_result(&recorder, PORT, "generate", &request_clone, &result);
            result
        })
    }

    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.fetch(&url).await;
            record_result(&recorder, PORT, "fetch", &serde_json::json!({ "url": url }), &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fake::{Scripted, ScriptedService};
    use crate::state::FormState;

    #[tokio::test]
    async fn records_successes_and_failures() {
        let dir = std::env::temp_dir().join("txt2img_recording_adapter_test");
        let path = dir.join("image_service.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "rec", "abc")));

        let (inner, _probe) = ScriptedService::new([Scripted::Url("/generated/a.png"), Scripted::Fail]);
        let service = RecordingImageService::new(Box::new(inner), Arc::clone(&recorder));

        let request = GenerateRequest::from_form(&FormState::new("a cat", "50", "x"));
        assert!(service.generate(&request).await.is_ok());
        assert!(service.generate(&request).await.is_err());
        assert!(service.fetch("http://localhost:8000/generated/a.png").await.is_ok());
        drop(service);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        let written = recorder.finish().unwrap();
        let content = std::fs::read_to_string(&written).unwrap();
        let cassette: crate::cassette::format::Cassette = serde_yaml::from_str(&content).unwrap();

        assert_eq!(cassette.interactions.len(), 3);
        assert_eq!(cassette.interactions[0].method, "generate");
        assert_eq!(cassette.interactions[0].input["scale"], serde_json::Value::Null);
        assert_eq!(cassette.interactions[0].output["Ok"]["url"], "/generated/a.png");
        assert!(cassette.interactions[1].output.get("Err").is_some());
        assert_eq!(cassette.interactions[2].method, "fetch");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
