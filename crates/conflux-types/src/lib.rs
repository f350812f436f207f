//! Shared configuration types for Conflux.
//!
//! This crate contains the project/workflow configuration model that the
//! builder layer produces and the validation core in `conflux-core`
//! consumes: projects, workflows, tasks, agents, tools, knowledge bases,
//! memories, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod agent;
pub mod error;
pub mod input;
pub mod knowledge;
pub mod memory;
pub mod project;
pub mod resource;
pub mod task;
pub mod tool;
pub mod workflow;
