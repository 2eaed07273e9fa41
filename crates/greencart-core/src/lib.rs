//! Shared HTTP plumbing for the GreenCart API.
//!
//! Error contract, configuration helpers, tracing, CORS, body parsers and the
//! ordered pipeline builder used by the composition root.

pub mod body;
pub mod config;
pub mod cors;
pub mod error;
pub mod health;
pub mod middleware;
pub mod pipeline;
pub mod tracing;
