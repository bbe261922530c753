//! Text rendering for run summaries.

pub mod table;

pub use table::Table;
