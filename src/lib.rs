//! Reddit link-feed pipeline.
//!
//! Fetches paginated listings from the JSON API, accumulates pages,
//! classifies each link into a presentation variant, and publishes the
//! accumulated models plus a loading-state signal for a list display to
//! observe. Rendering, navigation, and token refresh live elsewhere.

pub mod auth;
pub mod config;
pub mod fetcher;
pub mod loading;
pub mod models;
pub mod pagination;
pub mod presentation;
pub mod signal;
pub mod view_model;
