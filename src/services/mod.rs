//! Services layer for Steadfast
//!
//! Domain logic that sits between the route handlers and the database:
//!
//! - **Streak**: UTC day keys, sober-day counting, milestone catalog
//! - **Activity**: per-day activity record upserts and event dispatch
//! - **Sentiment**: wordlist scoring of journal content

pub mod activity;
pub mod sentiment;
pub mod streak;

pub use activity::ActivityType;
pub use streak::{achieved_milestones, sober_days, Milestone, MILESTONES};
