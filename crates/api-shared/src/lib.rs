//! # API Shared
//!
//! Shared definitions for the MDM drafting APIs.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `mdm` CLI so both surfaces emit the same shapes.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
