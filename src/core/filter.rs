//! Filter values keyed by an entity's filter shape, and the draft/applied pair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ControllerError;

/// Filter-field values constrained to a fixed field shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    shape: &'static [&'static str],
    values: BTreeMap<&'static str, String>,
}

impl Filter {
    /// Filter with every field blank.
    pub fn empty(shape: &'static [&'static str]) -> Self {
        Self {
            shape,
            values: BTreeMap::new(),
        }
    }

    /// Field names this filter accepts.
    pub fn shape(&self) -> &'static [&'static str] {
        self.shape
    }

    /// Sets a field; an empty value clears it.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), ControllerError> {
        let key = self.resolve_field(field)?;
        let value = value.into();
        if value.is_empty() {
            self.values.remove(key);
        } else {
            self.values.insert(key, value);
        }
        Ok(())
    }

    /// Raw (untrimmed) value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Clears one field, returning whether it held a non-blank value.
    pub fn clear_field(&mut self, field: &str) -> Result<bool, ControllerError> {
        let key = self.resolve_field(field)?;
        Ok(self
            .values
            .remove(key)
            .is_some_and(|v| !v.trim().is_empty()))
    }

    /// Clears every field.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// True when every field is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    /// Query built from the trimmed non-blank fields only.
    pub fn to_query(&self) -> Query {
        self.values
            .iter()
            .fold(Query::new(), |q, (field, value)| q.with(field, value))
    }

    /// Iterates the set fields in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn resolve_field(&self, field: &str) -> Result<&'static str, ControllerError> {
        self.shape
            .iter()
            .copied()
            .find(|f| *f == field)
            .ok_or_else(|| ControllerError::UnknownField(field.to_string()))
    }
}

/// Non-blank, trimmed filter constraints sent to the remote source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    /// Query with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint; blank values are dropped.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.0.insert(field.to_string(), value.to_string());
        }
        self
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Constraint value for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterates constraints in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Draft filter bound to inputs plus the applied filter that drives the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommit {
    draft: Filter,
    applied: Filter,
}

impl FilterCommit {
    /// Pair with both filters blank.
    pub fn new(shape: &'static [&'static str]) -> Self {
        Self {
            draft: Filter::empty(shape),
            applied: Filter::empty(shape),
        }
    }

    /// Filter bound to the inputs.
    pub fn draft(&self) -> &Filter {
        &self.draft
    }

    /// Filter driving the visible collection.
    pub fn applied(&self) -> &Filter {
        &self.applied
    }

    /// Edits the draft; never touches the applied filter.
    pub fn set_draft(&mut self, field: &str, value: impl Into<String>) -> Result<(), ControllerError> {
        self.draft.set(field, value)
    }

    /// Copies the draft into the applied filter.
    pub fn commit(&mut self) -> &Filter {
        self.applied = self.draft.clone();
        &self.applied
    }

    /// Drops one applied field and its draft input. Returns whether the
    /// applied filter changed; the draft is left alone when it did not.
    pub fn remove_applied(&mut self, field: &str) -> Result<bool, ControllerError> {
        let removed = self.applied.clear_field(field)?;
        if removed {
            self.draft.clear_field(field)?;
        }
        Ok(removed)
    }

    /// Resets draft and applied to blank.
    pub fn clear_all(&mut self) {
        self.draft.clear();
        self.applied.clear();
    }
}
