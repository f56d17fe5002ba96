//! Repository modules implementing reads and writes for every Ecosphere table.
//!
//! Each module adds methods to `EcoService` via `impl EcoService` blocks.

pub mod audit;
pub mod decision;
pub mod engagement;
pub mod investment;
pub mod narrative;
pub mod opportunity;
pub mod organization;
pub mod output;
pub mod practitioner;
pub mod profile;
pub mod submission;
