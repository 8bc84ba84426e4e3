//! Record/replay infrastructure for running without a live service.

pub mod loader;
pub mod format;
pub mod recorder;
pub mod replayer;
