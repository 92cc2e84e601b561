//! Live child collections.
//!
//! The association index owns a [`ChildList`] per (parent kind, parent id,
//! child kind). The first time a parent is seen, a handle to that list is bound
//! into the parent's [`ChildSlot`]; later appends land in the same storage and
//! show up on the parent without rebinding.

use std::{fmt, marker::PhantomData, sync::Arc};

use parking_lot::RwLock;
use serde::{Serialize, Serializer};

use crate::model::{DataModel, EntityRef, downcast, identity_of};

#[derive(Clone, Default)]
pub struct ChildList {
    items: Arc<RwLock<Vec<EntityRef>>>,
}

impl ChildList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities(items: Vec<EntityRef>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub fn push(&self, child: EntityRef) {
        self.items.write().push(child);
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Copies the current handles out of the list.
    pub fn snapshot(&self) -> Vec<EntityRef> {
        self.items.read().clone()
    }

    pub fn typed<C: DataModel>(&self) -> Vec<Arc<C>> {
        self.items.read().iter().filter_map(downcast::<C>).collect()
    }

    /// Whether both handles point at the same underlying storage.
    pub fn same_list(&self, other: &ChildList) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl fmt::Debug for ChildList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.read().iter()).finish()
    }
}

/// Parent-side field holding the children of kind `C`.
///
/// Starts unbound (`get` returns `None`); grouping binds it on first touch.
/// Cloning a slot aliases the bound list.
pub struct ChildSlot<C> {
    list: RwLock<Option<ChildList>>,
    _kind: PhantomData<fn() -> C>,
}

impl<C: DataModel> ChildSlot<C> {
    pub fn new() -> Self {
        Self {
            list: RwLock::new(None),
            _kind: PhantomData,
        }
    }

    pub fn bind(&self, list: ChildList) {
        *self.list.write() = Some(list);
    }

    pub fn list(&self) -> Option<ChildList> {
        self.list.read().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.list.read().is_some()
    }

    pub fn get(&self) -> Option<Vec<Arc<C>>> {
        self.list.read().as_ref().map(ChildList::typed::<C>)
    }

    /// Bound children, or an empty vector when nothing was ever bound.
    pub fn to_vec(&self) -> Vec<Arc<C>> {
        self.get().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.list.read().as_ref().map_or(0, ChildList::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers of the bound children in list order; entries without an
    /// identifier are left out.
    pub fn ids(&self) -> Vec<String> {
        self.to_vec()
            .iter()
            .filter_map(|child| identity_of(&**child).ok())
            .collect()
    }
}

impl<C: DataModel> Default for ChildSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DataModel> Clone for ChildSlot<C> {
    fn clone(&self) -> Self {
        Self {
            list: RwLock::new(self.list()),
            _kind: PhantomData,
        }
    }
}

impl<C: DataModel> fmt::Debug for ChildSlot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.list.read().as_ref() {
            Some(list) => fmt::Debug::fmt(list, f),
            None => f.write_str("unbound"),
        }
    }
}

impl<C> Serialize for ChildSlot<C>
where
    C: DataModel + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(children) => serializer.collect_seq(children.iter().map(|child| &**child)),
            None => serializer.serialize_none(),
        }
    }
}
