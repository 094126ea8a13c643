//! The row-processing pipeline.

mod run;

pub use run::{load_and_run, process_row, run_batch};
