//! Selection over a grouped row sequence.

use std::sync::Arc;

use ahash::AHashSet;

use crate::{
    config::GroupingConfig,
    engine::{GroupingEngine, GroupingStats},
    errors::GroupingError,
    mapper::{RowMapper, collect_group_specs, map_rows},
    model::{DataModel, EntityKind, EntityRef, downcast, identity_of},
    relation::SpecRef,
    snapshot::RowSnapshot,
};

/// Owns one query's mapped rows and declarations.
///
/// Every `select_*` call consumes the processor: grouping mutates the entities
/// in place and runs exactly once per row sequence.
pub struct ResultProcessor {
    rows: Vec<RowSnapshot>,
    specs: Vec<SpecRef>,
    config: GroupingConfig,
}

impl ResultProcessor {
    pub fn new(rows: Vec<RowSnapshot>, specs: Vec<SpecRef>) -> Self {
        Self {
            rows,
            specs,
            config: GroupingConfig::default(),
        }
    }

    /// Maps raw rows through `mappers` and collects their declarations.
    pub fn from_rows<R, I>(rows: I, mappers: &[&dyn RowMapper<R>]) -> Result<Self, GroupingError>
    where
        I: IntoIterator<Item = R>,
    {
        let snapshots = map_rows(rows, mappers)?;
        Ok(Self::new(snapshots, collect_group_specs(mappers)))
    }

    pub fn with_config(mut self, config: GroupingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rows(&self) -> &[RowSnapshot] {
        &self.rows
    }

    pub fn specs(&self) -> &[SpecRef] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entity of `kind` on the first row, after grouping.
    ///
    /// No distinctness check runs: if the rows hold several distinct entities
    /// of `kind`, the one on row 0 is returned and the rest are ignored.
    pub fn select_one_kind(self, kind: EntityKind) -> Result<Option<EntityRef>, GroupingError> {
        if self.rows.is_empty() {
            return Ok(None);
        }
        self.group()?;
        Ok(self.rows[0].get(kind).cloned())
    }

    pub fn select_one<T: DataModel>(self) -> Result<Option<Arc<T>>, GroupingError> {
        Ok(self
            .select_one_kind(EntityKind::of::<T>())?
            .as_ref()
            .and_then(downcast::<T>))
    }

    /// First occurrence of every distinct entity of `kind`, in row order.
    /// Rows without an entity of `kind` are skipped.
    pub fn select_many_kind(self, kind: EntityKind) -> Result<Vec<EntityRef>, GroupingError> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        self.group()?;
        let mut seen = AHashSet::new();
        let mut selected = Vec::new();
        for row in &self.rows {
            let Some(entity) = row.get(kind) else {
                continue;
            };
            if seen.insert(identity_of(&**entity)?) {
                selected.push(entity.clone());
            }
        }
        Ok(selected)
    }

    pub fn select_many<T: DataModel>(self) -> Result<Vec<Arc<T>>, GroupingError> {
        Ok(self
            .select_many_kind(EntityKind::of::<T>())?
            .iter()
            .filter_map(downcast::<T>)
            .collect())
    }

    /// Groups without selecting and returns the engine statistics.
    pub fn group_only(self) -> Result<GroupingStats, GroupingError> {
        self.group()
    }

    fn group(&self) -> Result<GroupingStats, GroupingError> {
        GroupingEngine::new(self.specs.clone(), self.config.clone()).group(&self.rows)
    }
}
