use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Access role.
    pub role: String,
    /// Department the user belongs to.
    pub department: String,
}

/// Create/update body for [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Access role.
    pub role: String,
    /// Department the user belongs to.
    pub department: String,
}

impl Record for User {
    type Id = u64;

    const FILTER_FIELDS: &'static [&'static str] = &["name", "email", "role", "department"];
    const LABEL: &'static str = "User";

    fn id(&self) -> u64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "role" => Some(self.role.clone()),
            "department" => Some(self.department.clone()),
            _ => None,
        }
    }
}
