/// Basic application code
pub mod app;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects and input validation
pub mod domain;
/// Error enums
pub mod error;
/// Subscription records and filters
pub mod model;
/// Subscription stores
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
