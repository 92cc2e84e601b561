use ahash::{AHashMap, AHashSet};

use crate::{config::DedupScope, model::EntityKind};

/// Parents whose child collection has already been deduplicated.
#[derive(Debug, Default)]
pub struct DedupMarkers {
    scope: DedupScope,
    marked: AHashMap<EntityKind, AHashSet<(String, Option<EntityKind>)>>,
}

impl DedupMarkers {
    pub fn new(scope: DedupScope) -> Self {
        Self {
            scope,
            marked: AHashMap::new(),
        }
    }

    /// Marks the parent once its collection has been rewritten; returns
    /// `false` when it was already marked under the configured scope.
    pub fn mark(&mut self, parent_kind: EntityKind, parent_id: &str, child_kind: EntityKind) -> bool {
        let key = (parent_id.to_owned(), self.scoped(child_kind));
        self.marked.entry(parent_kind).or_default().insert(key)
    }

    pub fn is_marked(&self, parent_kind: EntityKind, parent_id: &str, child_kind: EntityKind) -> bool {
        let key = (parent_id.to_owned(), self.scoped(child_kind));
        self.marked
            .get(&parent_kind)
            .is_some_and(|ids| ids.contains(&key))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.marked.values().map(|ids| ids.len()).sum()
    }

    fn scoped(&self, child_kind: EntityKind) -> Option<EntityKind> {
        match self.scope {
            DedupScope::Parent => None,
            DedupScope::ParentAndChild => Some(child_kind),
        }
    }
}
