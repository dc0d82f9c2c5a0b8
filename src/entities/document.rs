use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Document held in the portal's repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned id.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Document category.
    pub category: String,
    /// Owning department or user.
    pub owner: String,
    /// Upload date, `YYYY-MM-DD`.
    pub uploaded_on: String,
}

/// Create/update body for [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Document title.
    pub title: String,
    /// Document category.
    pub category: String,
    /// Owning department or user.
    pub owner: String,
}

impl Record for Document {
    type Id = String;

    const FILTER_FIELDS: &'static [&'static str] = &["title", "category", "owner", "uploaded_on"];
    const LABEL: &'static str = "Document";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "title" => Some(self.title.clone()),
            "category" => Some(self.category.clone()),
            "owner" => Some(self.owner.clone()),
            "uploaded_on" => Some(self.uploaded_on.clone()),
            _ => None,
        }
    }
}
