//! Types shared between the assistant orchestrator and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
