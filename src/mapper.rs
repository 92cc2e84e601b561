use crate::{
    errors::GroupingError,
    model::EntityRef,
    relation::SpecRef,
    snapshot::RowSnapshot,
};

/// Translates one raw row of type `R` into at most one entity.
///
/// Returning `Ok(None)` means the row holds no data for this mapper's kind,
/// e.g. the null side of an outer join.
pub trait RowMapper<R>: Send + Sync {
    fn map(&self, row: &R) -> Result<Option<EntityRef>, GroupingError>;

    /// Declarations applied to every row this mapper handles.
    fn group_specs(&self) -> Vec<SpecRef> {
        Vec::new()
    }
}

pub fn map_row<R>(row: &R, mappers: &[&dyn RowMapper<R>]) -> Result<RowSnapshot, GroupingError> {
    let mut snapshot = RowSnapshot::new();
    for mapper in mappers {
        if let Some(entity) = mapper.map(row)? {
            snapshot.insert(entity)?;
        }
    }
    Ok(snapshot)
}

pub fn map_rows<R, I>(rows: I, mappers: &[&dyn RowMapper<R>]) -> Result<Vec<RowSnapshot>, GroupingError>
where
    I: IntoIterator<Item = R>,
{
    rows.into_iter().map(|row| map_row(&row, mappers)).collect()
}

pub fn collect_group_specs<R>(mappers: &[&dyn RowMapper<R>]) -> Vec<SpecRef> {
    mappers.iter().flat_map(|mapper| mapper.group_specs()).collect()
}
