//! Live adapter for the diffusion service's HTTP API.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::error::ClientError;
use crate::params::{BaseOrigin, GENERATE_PATH};
use crate::ports::image_service::{
    FetchFuture, FetchedImage, GenerateFuture, GenerateRequest, GenerateResponse, ImageService,
};

/// Longest response body quoted back in an error.
const MAX_QUOTED_BODY: usize = 500;

/// Live image service that posts prompts to `<origin>/generate`.
pub struct HttpImageService {
    client: Client,
    origin: BaseOrigin,
}

impl HttpImageService {
    /// Create a service client for the given origin.
    #[must_use]
    pub fn new(origin: BaseOrigin) -> Self {
        Self { client: Client::new(), origin }
    }
}

impl ImageService for HttpImageService {
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = self.origin.join(GENERATE_PATH);
            tracing::debug!(%url, "posting generation request");

            let response = self.client.post(&url).json(&request).send().await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: truncate(&response_text),
                });
            }

            serde_json::from_str::<GenerateResponse>(&response_text).map_err(|e| {
                ClientError::MalformedResponse(format!("{e}. Body: {}", truncate(&response_text)))
            })
        })
    }

    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            tracing::debug!(%url, "downloading image");
            let response = self.client.get(&url).send().await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::Api { status: status.as_u16(), message: truncate(&body) });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let data = response.bytes().await?.to_vec();

            Ok(FetchedImage { data, content_type })
        })
    }
}

/// Cut a body down to [`MAX_QUOTED_BODY`] characters for error messages.
fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_QUOTED_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate("Internal Server Error"), "Internal Server Error");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundaries() {
        let body = "é".repeat(600);
        let cut = truncate(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), MAX_QUOTED_BODY + 3);
    }
}
