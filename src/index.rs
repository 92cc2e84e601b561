use std::collections::hash_map::Entry;

use ahash::AHashMap;

use crate::{
    children::ChildList,
    model::{EntityKind, EntityRef},
};

type ListsByChildKind = AHashMap<EntityKind, ChildList>;

/// parent kind -> parent id -> child kind -> live child list.
#[derive(Debug, Default)]
pub struct AssociationIndex {
    parents: AHashMap<EntityKind, AHashMap<String, ListsByChildKind>>,
    reserve: Option<usize>,
    lists: usize,
    appended: usize,
}

impl AssociationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes each parent kind's id map for `parents` distinct ids.
    pub fn with_capacity(parents: usize) -> Self {
        Self {
            reserve: Some(parents),
            ..Self::default()
        }
    }

    /// Appends `child` to the list of `(parent_kind, parent_id, child_kind)`.
    ///
    /// Returns `(false, list)` when the list was created by this call and
    /// `(true, list)` when it already existed. Duplicates are kept.
    pub fn record(
        &mut self,
        parent_kind: EntityKind,
        parent_id: String,
        child_kind: EntityKind,
        child: EntityRef,
    ) -> (bool, ChildList) {
        let reserve = self.reserve;
        let by_id = self
            .parents
            .entry(parent_kind)
            .or_insert_with(|| match reserve {
                Some(capacity) => AHashMap::with_capacity(capacity),
                None => AHashMap::new(),
            });
        self.appended += 1;
        match by_id.entry(parent_id).or_default().entry(child_kind) {
            Entry::Occupied(entry) => {
                let list = entry.get().clone();
                list.push(child);
                (true, list)
            }
            Entry::Vacant(entry) => {
                let list = ChildList::from_entities(vec![child]);
                entry.insert(list.clone());
                self.lists += 1;
                (false, list)
            }
        }
    }

    pub fn children(
        &self,
        parent_kind: EntityKind,
        parent_id: &str,
        child_kind: EntityKind,
    ) -> Option<&ChildList> {
        self.parents
            .get(&parent_kind)?
            .get(parent_id)?
            .get(&child_kind)
    }

    pub fn parent_count(&self, parent_kind: EntityKind) -> usize {
        self.parents.get(&parent_kind).map_or(0, |ids| ids.len())
    }

    /// Number of distinct lists created.
    pub fn list_count(&self) -> usize {
        self.lists
    }

    /// Number of `record` calls, duplicates included.
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn is_empty(&self) -> bool {
        self.lists == 0
    }
}
