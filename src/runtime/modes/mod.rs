//! Mode routing
//!
//! - `serve` (default): HTTP server
//! - `seed`: load the bundled fixture into the configured backend
//! - `config generate`: print or write a sample configuration

pub mod cli;
pub mod server;

pub use cli::{generate_config, run_seed};
pub use server::run_server;
