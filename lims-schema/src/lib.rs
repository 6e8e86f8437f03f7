//! LIMS Schema - Row Types
//!
//! Pure data structures mirroring the externally-owned LIMS PostgreSQL
//! schema. This crate contains ONLY data types and in-memory lookups -
//! no I/O. The schema belongs to the LIMS server; every table and column
//! name here must stay byte-identical to the external database.

pub mod ancestry;
pub mod tables;
pub mod udf;

pub use ancestry::{one_hop_ancestors, one_hop_descendants, AncestorEdge};
pub use tables::{
    Artifact, Container, ContainerPlacement, OutputMapping, Process, ProcessIoTracker,
    ProcessType, Project, Sample,
};
pub use udf::{udf_map, UdfField, UdfOwnerClass, UdfValue};
