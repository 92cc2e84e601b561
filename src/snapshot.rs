use std::sync::Arc;

use ahash::AHashMap;

use crate::{
    errors::GroupingError,
    model::{DataModel, EntityKind, EntityRef, downcast},
};

/// Entities produced for one result row, at most one per kind.
///
/// A missing kind means the row carries no entity of that kind, which is how
/// outer-join rows without a match show up.
#[derive(Clone, Debug, Default)]
pub struct RowSnapshot {
    entities: AHashMap<EntityKind, EntityRef>,
}

impl RowSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities<I>(entities: I) -> Result<Self, GroupingError>
    where
        I: IntoIterator<Item = EntityRef>,
    {
        let mut snapshot = Self::new();
        for entity in entities {
            snapshot.insert(entity)?;
        }
        Ok(snapshot)
    }

    pub fn insert(&mut self, entity: EntityRef) -> Result<(), GroupingError> {
        let kind = EntityKind::of_val(&*entity);
        if self.entities.contains_key(&kind) {
            return Err(GroupingError::duplicate_kind(kind.name()));
        }
        self.entities.insert(kind, entity);
        Ok(())
    }

    pub fn get(&self, kind: EntityKind) -> Option<&EntityRef> {
        self.entities.get(&kind)
    }

    pub fn get_as<T: DataModel>(&self) -> Option<Arc<T>> {
        self.get(EntityKind::of::<T>()).and_then(downcast::<T>)
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.entities.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.entities.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
