//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI.

mod ad_service;
mod favorite_service;

pub use ad_service::*;
pub use favorite_service::*;
