//! HTTP server for Steadfast

pub mod http;

pub use http::{run, AppState};
