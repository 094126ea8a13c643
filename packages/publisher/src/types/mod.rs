//! Data types for the publishing pipeline.

pub mod content;
pub mod job;
pub mod outcome;
