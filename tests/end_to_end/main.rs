//! End-to-end Tests
//!
//! Application-shaped scenarios through the `faultline` facade:
//! - Loading: factories, wrapping, and JSON transport of records
//! - Boundaries: foreign errors, panics and async callbacks
//! - Configuration: embedding the stack policy in application config

mod boundaries;
mod configuration;
mod loading;
