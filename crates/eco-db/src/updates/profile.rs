//! Profile update builder.

use serde::Serialize;

/// Fields a user may change on their own profile.
///
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practitioner_id: Option<Option<String>>,
}

impl ProfileUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.practitioner_id.is_none()
    }
}

#[derive(Default)]
pub struct ProfileUpdateBuilder(ProfileUpdate);

impl ProfileUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn display_name(mut self, val: Option<String>) -> Self {
        self.0.display_name = Some(val);
        self
    }

    #[must_use]
    pub fn practitioner_id(mut self, val: Option<String>) -> Self {
        self.0.practitioner_id = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> ProfileUpdate {
        self.0
    }
}
