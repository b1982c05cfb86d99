//! Database layer for Steadfast
//!
//! MongoDB-backed persistence with typed collections, automatic index
//! creation, and startup seeding of reference data.

pub mod mongo;
pub mod schemas;
pub mod seed;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection, MutMetadata};
