//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the form controller and an
//! external system. Implementations live in `src/adapters/`.

pub mod image_service;
pub mod notifier;

pub use image_service::{FetchedImage, GenerateRequest, ImageService};
pub use notifier::Notifier;
