//! Two-phase grouping over a materialized row sequence.
//!
//! Accumulate: every declaration is applied to every row. The first time a
//! `(parent kind, parent id, child kind)` triple is seen, the freshly created
//! list is bound onto that row's parent instance; later rows only append.
//!
//! Deduplicate: each bound parent, in binding order, has its collection reduced
//! to one entry per child identifier and rewritten. Parents already marked
//! (see [`DedupScope`](crate::config::DedupScope)) are skipped.

use std::collections::BTreeMap;

use ahash::AHashSet;
use serde::Serialize;

use crate::{
    children::ChildList,
    config::{ChildOrder, GroupingConfig},
    errors::GroupingError,
    index::AssociationIndex,
    markers::DedupMarkers,
    model::{EntityKind, EntityRef, identity_of},
    relation::SpecRef,
    snapshot::RowSnapshot,
    trace::{rowgraph_debug, rowgraph_trace},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    pub rows: usize,
    /// (row, declaration) pairs where both sides were present.
    pub associations: usize,
    /// Distinct child lists created.
    pub lists: usize,
    /// First-touch bindings onto a parent.
    pub bindings: usize,
    pub deduplicated: usize,
    /// Bindings skipped because the parent was already marked.
    pub skipped: usize,
    pub duplicates_removed: usize,
}

struct Binding {
    spec: usize,
    parent: EntityRef,
}

/// Single-use grouping state for one row sequence.
pub struct GroupingEngine {
    specs: Vec<SpecRef>,
    config: GroupingConfig,
    index: AssociationIndex,
    bindings: Vec<Binding>,
    markers: DedupMarkers,
    stats: GroupingStats,
}

impl GroupingEngine {
    pub fn new(specs: Vec<SpecRef>, config: GroupingConfig) -> Self {
        let index = match config.reserve_parents {
            Some(capacity) => AssociationIndex::with_capacity(capacity),
            None => AssociationIndex::new(),
        };
        let markers = DedupMarkers::new(config.dedup_scope);
        Self {
            specs,
            config,
            index,
            bindings: Vec::new(),
            markers,
            stats: GroupingStats::default(),
        }
    }

    /// Runs both phases over `rows`.
    pub fn group(mut self, rows: &[RowSnapshot]) -> Result<GroupingStats, GroupingError> {
        self.accumulate(rows)?;
        self.deduplicate()
    }

    pub fn accumulate(&mut self, rows: &[RowSnapshot]) -> Result<(), GroupingError> {
        for row in rows {
            self.stats.rows += 1;
            for (position, spec) in self.specs.iter().enumerate() {
                let (Some(parent), Some(child)) =
                    (row.get(spec.parent_kind()), row.get(spec.child_kind()))
                else {
                    continue;
                };
                let id = identity_of(&**parent)?;
                identity_of(&**child)?;
                self.stats.associations += 1;

                let (existed, list) =
                    self.index
                        .record(spec.parent_kind(), id, spec.child_kind(), child.clone());
                if !existed {
                    spec.set_children(parent, list);
                    rowgraph_trace!(relation = %spec.label(), "bound child list");
                    self.bindings.push(Binding {
                        spec: position,
                        parent: parent.clone(),
                    });
                }
            }
        }
        self.stats.lists = self.index.list_count();
        self.stats.bindings = self.bindings.len();
        rowgraph_debug!(
            rows = self.stats.rows,
            associations = self.stats.associations,
            lists = self.stats.lists,
            "accumulated rows"
        );
        Ok(())
    }

    pub fn deduplicate(mut self) -> Result<GroupingStats, GroupingError> {
        for binding in &self.bindings {
            let spec = &self.specs[binding.spec];
            let parent = &binding.parent;
            let id = identity_of(&**parent)?;
            let parent_kind = EntityKind::of_val(&**parent);
            if self.markers.is_marked(parent_kind, &id, spec.child_kind()) {
                self.stats.skipped += 1;
                rowgraph_trace!(relation = %spec.label(), parent = %id, "already deduplicated");
                continue;
            }
            // A declaration with nothing bound must not claim the marker.
            let Some(children) = spec.children(parent) else {
                continue;
            };
            let raw = children.snapshot();
            let before = raw.len();
            let distinct = distinct_children(raw, self.config.child_order)?;
            self.stats.duplicates_removed += before - distinct.len();
            spec.set_children(parent, ChildList::from_entities(distinct));
            self.markers.mark(parent_kind, &id, spec.child_kind());
            self.stats.deduplicated += 1;
        }
        rowgraph_debug!(
            deduplicated = self.stats.deduplicated,
            skipped = self.stats.skipped,
            removed = self.stats.duplicates_removed,
            "deduplicated children"
        );
        Ok(self.stats)
    }

    pub fn index(&self) -> &AssociationIndex {
        &self.index
    }

    pub fn stats(&self) -> GroupingStats {
        self.stats
    }
}

fn distinct_children(
    children: Vec<EntityRef>,
    order: ChildOrder,
) -> Result<Vec<EntityRef>, GroupingError> {
    match order {
        ChildOrder::Identifier => {
            let mut by_id: BTreeMap<String, EntityRef> = BTreeMap::new();
            for child in children {
                let id = identity_of(&*child)?;
                by_id.entry(id).or_insert(child);
            }
            Ok(by_id.into_values().collect())
        }
        ChildOrder::FirstSeen => {
            let mut seen = AHashSet::with_capacity(children.len());
            let mut distinct = Vec::with_capacity(children.len());
            for child in children {
                if seen.insert(identity_of(&*child)?) {
                    distinct.push(child);
                }
            }
            Ok(distinct)
        }
    }
}
