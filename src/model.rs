//! Entity model shared by every stage of the grouping pipeline.
//!
//! An entity is any `'static + Send + Sync` value implementing [`DataModel`].
//! Entities travel through the engine as [`EntityRef`] handles so the same
//! instance can sit in a row snapshot and in a parent's child list at once.

use std::{
    any::{Any, TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::errors::GroupingError;

/// Shared, type-erased handle to an entity instance.
pub type EntityRef = Arc<dyn DataModel>;

/// Upcasting support for [`DataModel`] trait objects.
///
/// Blanket-implemented for every eligible type; never implement it by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// A value that can take part in grouping.
///
/// Two entities are the same logical instance iff they share a kind and an
/// identifier. `unique_identifier` runs for every row, so keep it cheap.
pub trait DataModel: AsAny + fmt::Debug {
    /// Stable identifier of this instance; `None` means identity cannot be
    /// established and fails the grouping operation.
    fn unique_identifier(&self) -> Option<String>;
}

/// Type tag used as a map key wherever the engine indexes by entity kind.
#[derive(Clone, Copy)]
pub struct EntityKind {
    id: TypeId,
    name: &'static str,
}

impl EntityKind {
    pub fn of<T: DataModel>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Kind of the concrete value behind `entity`.
    pub fn of_val(entity: &dyn DataModel) -> Self {
        Self {
            id: entity.as_any().type_id(),
            name: AsAny::type_name(entity),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for EntityKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityKind {}

impl Hash for EntityKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityKind({})", self.short_name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Wraps a concrete entity into a shared handle.
pub fn entity<T: DataModel>(value: T) -> EntityRef {
    Arc::new(value)
}

pub fn downcast_ref<T: DataModel>(entity: &dyn DataModel) -> Option<&T> {
    entity.as_any().downcast_ref::<T>()
}

pub fn downcast<T: DataModel>(entity: &EntityRef) -> Option<Arc<T>> {
    <dyn DataModel as AsAny>::into_any(Arc::clone(entity))
        .downcast::<T>()
        .ok()
}

/// Identifier of `entity`, or [`GroupingError::InvalidIdentity`].
pub fn identity_of(entity: &dyn DataModel) -> Result<String, GroupingError> {
    entity
        .unique_identifier()
        .ok_or_else(|| GroupingError::invalid_identity(EntityKind::of_val(entity).name()))
}
