//! Steadfast - backend for a sobriety support companion
//!
//! "One day at a time"
//!
//! Steadfast serves a recovery app over plain HTTP/JSON: accounts with
//! JWT auth, a sobriety streak with milestones, a mood journal with
//! sentiment scoring, daily activity tracking, an intake assessment,
//! and seeded helpline and quote reference data, all on MongoDB.
//!
//! ## Feature areas
//!
//! - **Accounts**: signup/login with argon2 hashes and JWT sessions
//! - **Streak**: UTC day math for sober days and milestones
//! - **Journal**: mood entries scored for sentiment at write time
//! - **Activity**: one accumulating record per user per UTC day
//! - **Assessment**: intake answers folded back into the profile
//! - **Resources**: helplines and quotes seeded at startup

pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, SteadfastError};
