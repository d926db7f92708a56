//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Turn submission, transcript, and status handlers.
pub mod chat;
/// Liveness probe.
pub mod health;
/// Role listing.
pub mod roles;
