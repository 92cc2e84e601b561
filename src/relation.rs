//! Parent/child relationship declarations.

use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    children::{ChildList, ChildSlot},
    model::{DataModel, EntityKind, EntityRef, downcast_ref},
};

/// Declares that entities of `child_kind` group under entities of
/// `parent_kind`, and how to read and write the child collection.
pub trait GroupSpec: Send + Sync {
    fn parent_kind(&self) -> EntityKind;

    fn child_kind(&self) -> EntityKind;

    /// Current child collection of `parent`; `None` when nothing was bound yet.
    fn children(&self, parent: &EntityRef) -> Option<ChildList>;

    fn set_children(&self, parent: &EntityRef, children: ChildList);

    fn label(&self) -> String {
        format!("{} -> {}", self.parent_kind(), self.child_kind())
    }
}

pub type SpecRef = Arc<dyn GroupSpec>;

/// Typed declaration backed by a [`ChildSlot`] field on the parent.
///
/// ```ignore
/// let spec = Relation::<Author, Book>::new(|author| &author.books).shared();
/// ```
pub struct Relation<P, C> {
    slot: fn(&P) -> &ChildSlot<C>,
    _kinds: PhantomData<fn() -> (P, C)>,
}

impl<P: DataModel, C: DataModel> Relation<P, C> {
    pub fn new(slot: fn(&P) -> &ChildSlot<C>) -> Self {
        Self {
            slot,
            _kinds: PhantomData,
        }
    }

    pub fn shared(self) -> SpecRef {
        Arc::new(self)
    }

    fn slot_of<'a>(&self, parent: &'a EntityRef) -> Option<&'a ChildSlot<C>> {
        downcast_ref::<P>(&**parent).map(self.slot)
    }
}

impl<P: DataModel, C: DataModel> GroupSpec for Relation<P, C> {
    fn parent_kind(&self) -> EntityKind {
        EntityKind::of::<P>()
    }

    fn child_kind(&self) -> EntityKind {
        EntityKind::of::<C>()
    }

    fn children(&self, parent: &EntityRef) -> Option<ChildList> {
        self.slot_of(parent).and_then(ChildSlot::list)
    }

    fn set_children(&self, parent: &EntityRef, children: ChildList) {
        if let Some(slot) = self.slot_of(parent) {
            slot.bind(children);
        }
    }
}

impl<P: DataModel, C: DataModel> fmt::Debug for Relation<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("parent", &EntityKind::of::<P>())
            .field("child", &EntityKind::of::<C>())
            .finish()
    }
}
