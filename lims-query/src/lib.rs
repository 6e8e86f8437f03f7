//! LIMS Query - change-tracking and lineage queries.
//!
//! A thin read-only query layer over the externally-owned LIMS
//! PostgreSQL schema, answering two question classes for polling and
//! notification jobs:
//!
//! - "what changed in the last N hours" - the change-window queries over
//!   projects and processes, deduplicated by external identifier;
//! - "what is upstream/downstream of this process" - one-hop lineage
//!   traversals over the artifact ancestry graph.
//!
//! All operations are stateless single-shot SELECTs through a pooled
//! connection. Configuration is loaded once at startup ([`DbConfig`]) and
//! handed by reference to the session factory ([`LimsClient::from_config`]).

pub mod changes;
pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod interval;
pub mod lineage;
pub mod process;
pub mod udfs;

pub use changes::union_project_luids;
pub use client::LimsClient;
pub use config::DbConfig;
pub use error::{LimsError, LimsResult};
pub use interval::{Interval, IntervalUnit};
pub use process::dedupe_processes;

// Schema row types, re-exported for callers.
pub use lims_schema as schema;
