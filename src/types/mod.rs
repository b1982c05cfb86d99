//! Shared types for Steadfast

pub mod error;

pub use error::{Result, SteadfastError};
