#![deny(missing_docs)]

//! Core library for the docbrief server.

/// HTTP routing and REST handlers.
pub mod api;
/// Briefing pipeline: uploads, indexing, and generation.
pub mod briefing;
/// Environment-driven configuration management.
pub mod config;
/// Gemini File Search client.
pub mod gemini;
/// Structured logging and tracing setup.
pub mod logging;
/// Brief and search activity counters.
pub mod metrics;
/// Project-to-store registry.
pub mod registry;
