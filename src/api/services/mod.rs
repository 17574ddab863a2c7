pub mod ads;
pub mod agent;
pub mod error_code;
pub mod favorites;
pub mod health;
mod helpers;
pub mod routes;
pub mod sse;
mod types;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{api_result, error_from_adscope, error_response, success_response};
pub use routes::api_routes;
pub use sse::SseSettings;
pub use types::*;
