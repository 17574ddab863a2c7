//! adscope - ad intelligence API
//!
//! Serves a catalogue of ad creatives with filtering, sorting and
//! pagination, per-user favorites, and asynchronous agent tasks whose
//! progress is streamed over Server-Sent Events.
//!
//! # Architecture
//! - `query`: filter / sort / paginate pipeline
//! - `storage`: repository traits with in-memory and SeaORM backends
//! - `services`: ad catalogue and favorites business logic
//! - `agent`: task orchestrator boundary and the local implementation
//! - `api`: HTTP handlers, SSE relay and middleware
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod query;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
