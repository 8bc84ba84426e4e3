//! Replaying adapter for the `ImageService` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::adapters::recording::image_service::PORT;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::ClientError;
use crate::ports::image_service::{
    FetchFuture, FetchedImage, GenerateFuture, GenerateRequest, GenerateResponse, ImageService,
};

/// Serves recorded service results from a cassette.
pub struct ReplayingImageService {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageService {
    /// Create a replaying service backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn replay<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, ClientError> {
        let output = next_output(&self.replayer, PORT, method).map_err(ClientError::Replayed)?;
        replay_result::<T>(output).map_err(|e| ClientError::Replayed(e.to_string()))
    }
}

impl ImageService for ReplayingImageService {
    fn generate(&self, _request: &GenerateRequest) -> GenerateFuture<'_> {
        let result = self.replay::<GenerateResponse>("generate");
        Box::pin(async move { result })
    }

    fn fetch(&self, _url: &str) -> FetchFuture<'_> {
        let result = self.replay::<FetchedImage>("fetch");
        Box::pin(async move { result })
    }
}
