//! Test utilities for the GreenCart API.
//!
//! Provides an echo router for routing assertions, webhook signing, and a
//! media-storage mock. Import from tests only, never from production code.

pub mod echo;
pub mod media;
pub mod stripe;
