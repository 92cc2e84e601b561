//! Per-query grouping configuration.
//!
//! Defaults reproduce the established grouping semantics exactly. The
//! alternative settings are opt-in for callers that want the corrected
//! behavior and accept the observable difference.

/// Granularity of the "already deduplicated" marker.
///
/// # Default Behavior
///
/// [`DedupScope::Parent`] marks a parent once per `(kind, id)`. When one parent
/// kind participates in two declarations, only the collection of the first
/// declaration reached during deduplication is reduced; the other keeps its raw,
/// possibly repeated entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DedupScope {
    #[default]
    Parent,
    /// Marker keyed by `(parent kind, parent id, child kind)`, so every
    /// declaration gets deduplicated.
    ParentAndChild,
}

/// Order of a parent's child collection after deduplication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChildOrder {
    /// Ascending byte-wise comparison of the child identifier, so `"10"`
    /// sorts before `"2"`.
    #[default]
    Identifier,
    /// Order in which each distinct child was first appended.
    FirstSeen,
}

/// Complete configuration for one grouping operation.
///
/// ```rust
/// use rowgraph::{ChildOrder, DedupScope, GroupingConfig};
/// let config = GroupingConfig::default();
/// assert_eq!(config.dedup_scope, DedupScope::Parent);
/// assert_eq!(config.child_order, ChildOrder::Identifier);
/// assert!(config.reserve_parents.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupingConfig {
    pub dedup_scope: DedupScope,
    pub child_order: ChildOrder,
    /// Capacity hint for the number of distinct parents per kind.
    ///
    /// **Default:** `None`
    pub reserve_parents: Option<usize>,
}

impl GroupingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker per declaration, identifier-ordered children.
    pub fn per_relation() -> Self {
        Self {
            dedup_scope: DedupScope::ParentAndChild,
            ..Self::default()
        }
    }

    pub fn with_dedup_scope(mut self, scope: DedupScope) -> Self {
        self.dedup_scope = scope;
        self
    }

    pub fn with_child_order(mut self, order: ChildOrder) -> Self {
        self.child_order = order;
        self
    }

    pub fn with_reserve_parents(mut self, capacity: usize) -> Self {
        self.reserve_parents = Some(capacity);
        self
    }
}
