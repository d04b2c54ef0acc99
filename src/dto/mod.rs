//! Serde DTOs exchanged over the HTTP surface.

pub mod content;
pub mod health;
pub mod quiz;
pub mod session;
pub mod validation;
