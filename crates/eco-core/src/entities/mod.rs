//! Entity structs for every Ecosphere table.
//!
//! Each struct maps to one row in the hosted database. Optional columns are
//! `Option`; dates without a time component use `NaiveDate`.

mod audit;
mod decision;
mod engagement;
mod investment;
mod narrative;
mod opportunity;
mod organization;
mod output;
mod practitioner;
mod profile;
mod submission;

pub use audit::AuditEntry;
pub use decision::Decision;
pub use engagement::Engagement;
pub use investment::{Investment, InvestmentTotal};
pub use narrative::Narrative;
pub use opportunity::{Opportunity, OpportunityOverview};
pub use organization::Organization;
pub use output::Output;
pub use practitioner::Practitioner;
pub use profile::Profile;
pub use submission::Submission;
