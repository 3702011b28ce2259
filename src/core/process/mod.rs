//! Item processing
//!
//! - [`orchestrator`] - one item from lease to acknowledge
//! - [`policy`] - acknowledge or release a soft-failed lease
//! - [`runner`] - the worker loop around the orchestrator

pub mod orchestrator;
pub mod policy;
pub mod runner;

pub use orchestrator::{Orchestrator, OrchestratorSettings};
pub use policy::{AckDecision, AckPolicy};
pub use runner::{RunSummary, Worker, WorkerSettings};
