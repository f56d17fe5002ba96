//! ID prefixes for database-generated identifiers.
//!
//! IDs look like `org-a3f8b2c1`: a three-letter prefix, a dash, and eight hex
//! characters produced by the database. Profiles are the exception; their ID is
//! the authentication provider's user ID.

pub const PREFIX_ORGANIZATION: &str = "org";
pub const PREFIX_PRACTITIONER: &str = "prc";
pub const PREFIX_OPPORTUNITY: &str = "opp";
pub const PREFIX_INVESTMENT: &str = "inv";
pub const PREFIX_DECISION: &str = "dec";
pub const PREFIX_NARRATIVE: &str = "nar";
pub const PREFIX_OUTPUT: &str = "out";
pub const PREFIX_ENGAGEMENT: &str = "eng";
pub const PREFIX_SUBMISSION: &str = "sub";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ORGANIZATION,
    PREFIX_PRACTITIONER,
    PREFIX_OPPORTUNITY,
    PREFIX_INVESTMENT,
    PREFIX_DECISION,
    PREFIX_NARRATIVE,
    PREFIX_OUTPUT,
    PREFIX_ENGAGEMENT,
    PREFIX_SUBMISSION,
    PREFIX_AUDIT,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_unique_and_three_chars() {
        let set: HashSet<_> = ALL_PREFIXES.iter().collect();
        assert_eq!(set.len(), ALL_PREFIXES.len());
        assert!(ALL_PREFIXES.iter().all(|p| p.len() == 3));
    }
}
