//! Record contract, list requests and list pages.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

use serde::{Deserialize, Serialize};

use crate::{core::filter::Query, types::PageNo};

/// Server-backed entity managed by a controller.
///
/// Identity comparisons always go through [`Record::id`].
pub trait Record: Clone + Debug + Send + Sync + 'static {
    /// Stable identity type.
    type Id: Clone + Debug + Display + Eq + Hash + Send + Sync + 'static;

    /// Filter fields the entity's screens expose, in display order.
    const FILTER_FIELDS: &'static [&'static str];
    /// Human label used in notifications, e.g. `"Fuel card"`.
    const LABEL: &'static str;

    /// Stable identity of this record.
    fn id(&self) -> Self::Id;

    /// Text value of a filter field, if the record has one.
    fn field_value(&self, field: &str) -> Option<String>;

    /// Local match used by [`crate::types::ResolveMode::Local`]: every query
    /// value must occur, case-insensitively, in the matching field.
    fn matches(&self, query: &Query) -> bool {
        query.iter().all(|(field, needle)| {
            let needle = needle.to_lowercase();
            self.field_value(field)
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        })
    }
}

/// One response of [`crate::engine::traits::RemoteSource::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<R> {
    /// Records in server order.
    pub items: Vec<R>,
    /// Total matching records on the server.
    pub total: usize,
}

impl<R> Page<R> {
    /// Page whose total equals its item count.
    pub fn complete(items: Vec<R>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Arguments of a remote list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRequest {
    /// Non-blank filter pairs; blank fields are never sent.
    pub query: Query,
    /// Active collection scope (tab), if any.
    pub scope: Option<String>,
    /// 1-indexed page.
    pub page: PageNo,
    /// Page size requested from the server.
    pub page_size: usize,
}
