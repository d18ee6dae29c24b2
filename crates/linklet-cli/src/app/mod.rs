//! Wiring between the command line and the `linklet` core.
//!
//! - [`config`]: CLI/env parsing and validation.
//! - [`telemetry`]: `tracing-subscriber` setup.
//! - [`store`]: a JSON-lines [`DurableStore`](linklet::DurableStore).
//! - [`commands`]: subcommand execution.

pub mod commands;
pub mod config;
pub mod store;
pub mod telemetry;
