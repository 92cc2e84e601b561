//! SQLite front-end: run a join query, materialize its rows, and hand them to
//! row mappers.
//!
//! The SQL text is executed as given; grouping happens only after every row
//! has been fetched.

use std::sync::Arc;

use rusqlite::{
    Connection,
    types::{FromSql, ToSql, Value, ValueRef},
};

use crate::{
    config::GroupingConfig,
    errors::GroupingError,
    mapper::RowMapper,
    query::ResultProcessor,
    trace::rowgraph_debug,
};

/// One fully materialized result row.
#[derive(Clone, Debug)]
pub struct SqlRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl SqlRow {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw value of `column`; exact name match first, then ASCII
    /// case-insensitive.
    pub fn value(&self, column: &str) -> Option<&Value> {
        let position = self
            .columns
            .iter()
            .position(|name| name == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|name| name.eq_ignore_ascii_case(column))
            })?;
        self.values.get(position)
    }

    pub fn is_null(&self, column: &str) -> Result<bool, GroupingError> {
        self.require(column).map(|value| matches!(value, Value::Null))
    }

    /// Typed column access. Use `Option<T>` for nullable columns.
    pub fn get<T: FromSql>(&self, column: &str) -> Result<T, GroupingError> {
        let value = self.require(column)?;
        T::column_result(ValueRef::from(value))
            .map_err(|e| GroupingError::column(format!("{column}: {e}")))
    }

    fn require(&self, column: &str) -> Result<&Value, GroupingError> {
        self.value(column)
            .ok_or_else(|| GroupingError::column_not_found(column))
    }
}

/// Entry point bound to one connection.
pub struct SqlSelector<'c> {
    conn: &'c Connection,
    config: GroupingConfig,
}

impl<'c> SqlSelector<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self::with_config(conn, GroupingConfig::default())
    }

    pub fn with_config(conn: &'c Connection, config: GroupingConfig) -> Self {
        Self { conn, config }
    }

    pub fn process_sql(&self, sql: &str) -> SqlQuery<'c> {
        SqlQuery {
            conn: self.conn,
            sql: sql.to_string(),
            params: Vec::new(),
            config: self.config.clone(),
        }
    }
}

/// A statement with its named parameters, built fluently.
pub struct SqlQuery<'c> {
    conn: &'c Connection,
    sql: String,
    params: Vec<(String, Value)>,
    config: GroupingConfig,
}

impl<'c> SqlQuery<'c> {
    /// Binds a named parameter. A bare `name` is treated as `:name`; rebinding
    /// a name replaces the previous value.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        let name = normalize_param(name);
        let value = value.into();
        match self.params.iter_mut().find(|(bound, _)| *bound == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn fetch_rows(&self) -> Result<Vec<SqlRow>, GroupingError> {
        if self.params.iter().any(|(name, _)| name.len() < 2) {
            return Err(GroupingError::invalid_input("bind name required"));
        }
        let mut stmt = self
            .conn
            .prepare(&self.sql)
            .map_err(|e| GroupingError::query(e.to_string()))?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let params: Vec<(&str, &dyn ToSql)> = self
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();
        let mut rows = stmt
            .query(params.as_slice())
            .map_err(|e| GroupingError::query(e.to_string()))?;
        let mut fetched = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| GroupingError::query(e.to_string()))?
        {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(
                    row.get::<_, Value>(idx)
                        .map_err(|e| GroupingError::query(e.to_string()))?,
                );
            }
            fetched.push(SqlRow::new(Arc::clone(&columns), values));
        }
        rowgraph_debug!(
            sql = %self.sql,
            params = self.params.len(),
            rows = fetched.len(),
            "fetched rows"
        );
        Ok(fetched)
    }

    /// Fetches every row, maps it, and returns a processor ready for selection.
    pub fn apply_row_mappers(
        self,
        mappers: &[&dyn RowMapper<SqlRow>],
    ) -> Result<ResultProcessor, GroupingError> {
        let rows = self.fetch_rows()?;
        Ok(ResultProcessor::from_rows(rows, mappers)?.with_config(self.config))
    }
}

fn normalize_param(name: &str) -> String {
    let name = name.trim();
    if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_param_adds_colon_prefix() {
        assert_eq!(normalize_param("id"), ":id");
        assert_eq!(normalize_param(":id"), ":id");
        assert_eq!(normalize_param("@id"), "@id");
        assert_eq!(normalize_param(" id "), ":id");
    }

    #[test]
    fn row_lookup_falls_back_to_case_insensitive() {
        let row = SqlRow::new(
            Arc::from(vec!["authorId".to_string(), "title".to_string()]),
            vec![Value::Integer(4), Value::Null],
        );
        assert_eq!(row.get::<i64>("authorId").unwrap(), 4);
        assert_eq!(row.get::<i64>("AUTHORID").unwrap(), 4);
        assert_eq!(row.get::<Option<String>>("title").unwrap(), None);
        assert!(row.is_null("title").unwrap());
        assert!(matches!(
            row.get::<i64>("missing"),
            Err(GroupingError::ColumnNotFound(_))
        ));
    }
}
