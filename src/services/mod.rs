//! Service layer sitting between the HTTP routes and the state/providers.

/// Content search and detail lookups across the provider adapters.
pub mod content_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Quiz generation and normalization.
pub mod quiz_service;
/// Gameplay session lifecycle and timers.
pub mod session_service;
