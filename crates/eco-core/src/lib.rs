//! # eco-core
//!
//! Core types shared by every Ecosphere crate.
//!
//! - Entity structs for each table in the hosted database (organizations,
//!   practitioners, opportunities, investments, decisions, narratives, outputs,
//!   engagements, profiles, submissions, audit entries)
//! - Fixed status enumerations and their string forms
//! - ID prefix constants
//! - The `ActionResult` envelope returned to calling forms
//! - Display formatting helpers (currency, deadlines, initials)
//! - Cross-cutting error types

pub mod action;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod format;
pub mod identity;
pub mod ids;
