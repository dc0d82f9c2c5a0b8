use hashbrown::HashMap;

use crate::{error::StoreError, record::Record};

/// What the visible collection currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visible<R> {
    /// Visible is the cache itself.
    Mirror,
    /// Visible is a query result (remote, or a local filter pass).
    Results(Vec<R>),
    /// The last fetch failed; nothing is shown.
    Failed,
}

/// Cached collection plus the projection that produces the visible list.
///
/// The cache is the only source of truth; confirmed mutations patch the
/// cache and, when the view holds query results, those results in place.
#[derive(Debug)]
pub struct CollectionStore<R: Record> {
    records: Vec<R>,
    pos: HashMap<R::Id, usize>,
    visible: Visible<R>,
}

impl<R: Record> Default for CollectionStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            pos: HashMap::new(),
            visible: Visible::Mirror,
        }
    }
}

impl<R: Record> CollectionStore<R> {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached collection, newest first after creates.
    pub fn cache(&self) -> &[R] {
        &self.records
    }

    /// Collection the screen shows.
    pub fn visible(&self) -> &[R] {
        match &self.visible {
            Visible::Mirror => &self.records,
            Visible::Results(items) => items,
            Visible::Failed => &[],
        }
    }

    /// Which projection is active.
    pub fn visible_state(&self) -> &Visible<R> {
        &self.visible
    }

    /// Cached record count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Visible record count.
    pub fn visible_len(&self) -> usize {
        self.visible().len()
    }

    /// Cached record by id.
    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.pos.get(id).and_then(|idx| self.records.get(*idx))
    }

    /// True when `id` is cached.
    pub fn contains(&self, id: &R::Id) -> bool {
        self.pos.contains_key(id)
    }

    /// Replaces the cache wholesale with a confirmed server snapshot.
    pub fn replace_cache(&mut self, items: Vec<R>) {
        self.records = items;
        self.reindex();
    }

    /// Shows the cache as-is.
    pub fn show_all(&mut self) {
        self.visible = Visible::Mirror;
    }

    /// Shows a query result.
    pub fn show_results(&mut self, items: Vec<R>) {
        self.visible = Visible::Results(items);
    }

    /// Shows nothing after a failed fetch; the cache is kept.
    pub fn show_failed(&mut self) {
        self.visible = Visible::Failed;
    }

    /// Prepends a server-confirmed new record to the cache and the view,
    /// regardless of whether it matches the applied filter.
    pub fn apply_created(&mut self, rec: R) -> Result<(), StoreError> {
        let id = rec.id();
        if self.contains(&id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        if matches!(self.visible, Visible::Failed) {
            self.visible = Visible::Results(Vec::new());
        }
        if let Visible::Results(items) = &mut self.visible {
            items.insert(0, rec.clone());
        }
        for idx in self.pos.values_mut() {
            *idx += 1;
        }
        self.pos.insert(id, 0);
        self.records.insert(0, rec);
        Ok(())
    }

    /// Replaces the record with the same id in place, wherever it is held.
    pub fn apply_updated(&mut self, rec: R) -> Result<(), StoreError> {
        let id = rec.id();
        let mut found = false;

        if let Visible::Results(items) = &mut self.visible {
            if let Some(slot) = items.iter_mut().find(|r| r.id() == id) {
                *slot = rec.clone();
                found = true;
            }
        }

        if let Some(idx) = self.pos.get(&id).copied() {
            self.records[idx] = rec;
            found = true;
        }

        if found {
            Ok(())
        } else {
            Err(StoreError::MissingRecord(id.to_string()))
        }
    }

    /// Removes the record with this id from the cache and the view.
    pub fn apply_deleted(&mut self, id: &R::Id) -> Result<R, StoreError> {
        let from_view = match &mut self.visible {
            Visible::Results(items) => items
                .iter()
                .position(|r| r.id() == *id)
                .map(|idx| items.remove(idx)),
            Visible::Mirror | Visible::Failed => None,
        };

        let from_cache = self.pos.remove(id).map(|removed| {
            for idx in self.pos.values_mut() {
                if *idx > removed {
                    *idx -= 1;
                }
            }
            self.records.remove(removed)
        });

        from_cache
            .or(from_view)
            .ok_or_else(|| StoreError::MissingRecord(id.to_string()))
    }

    fn reindex(&mut self) {
        self.pos.clear();
        for (idx, rec) in self.records.iter().enumerate() {
            self.pos.insert(rec.id(), idx);
        }
    }
}
