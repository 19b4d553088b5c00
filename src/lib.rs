//! Service support utilities for HTTP microservices.
//!
//! This crate collects the glue a small service fleet keeps rewriting:
//! declarative environment-variable configuration, structured logging
//! bootstrap, request authentication, outbound TLS client construction, and
//! a SQL execution shim. Each piece adapts an existing stack (tracing, axum,
//! reqwest, sqlx) rather than replacing it.
//!
//! # Modules
//!
//! ## Config (`config`)
//!
//! A schema of typed, optionally-required options resolved from a prefixed
//! environment namespace into a nested structure, plus a shell-sourceable
//! template renderer for operators:
//!
//! ```rust,ignore
//! use svckit::config::{resolve_from_env, ConfigOption};
//!
//! let options = vec![
//!     ConfigOption::new("db.host").default("localhost").help("Database host"),
//!     ConfigOption::new("db.port").default(5432),
//!     ConfigOption::new("db.password"),
//! ];
//!
//! let config = resolve_from_env("MYAPP_", &options)?;
//! ```
//!
//! ## Logging (`logging`)
//!
//! Global tracing subscriber setup (JSON or human-readable) and per-request
//! trace middleware:
//!
//! ```rust,ignore
//! use svckit::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::new().with_json_format(true))?;
//! ```
//!
//! ## Server (`server`) and client (`client`)
//!
//! Authenticated-user extraction for inbound requests and TLS-policy-aware
//! client construction for outbound ones.
//!
//! ## Database (`db`)
//!
//! A [`db::QueryExecutor`] capability trait with pool-owning and
//! transaction-borrowing implementations.
//!
//! # Features
//!
//! - `config` - Configuration schema utilities (enabled by default)
//! - `logging` - Logging setup (enabled by default)
//! - `server` - Server-side request helpers (enabled by default)
//! - `client` - Client construction helpers (enabled by default)
//! - `db` - SQL execution shim (enabled by default)

pub mod error;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "db")]
pub mod db;

// Re-export commonly used types
pub use error::{Result, SvckitError};

#[cfg(feature = "config")]
pub use config::{
    print_env_template, print_env_template_and_exit, render_env_template, resolve,
    resolve_from_env, ConfigError, ConfigOption, OptionType,
};

#[cfg(feature = "logging")]
pub use logging::{init_logging, request_trace_layer, LogConfig};

#[cfg(feature = "server")]
pub use server::{authenticated_userid, AuthError, AUTH_USER_HEADER};

#[cfg(feature = "client")]
pub use client::build_http_client;

#[cfg(feature = "db")]
pub use db::{rows_to_json, PoolExecutor, QueryExecutor, TransactionExecutor};
