//! Live adapters talking to real systems.

pub mod http;
pub mod terminal;
