//! INSERT statement builder using the typestate pattern.

use std::marker::PhantomData;

use crate::ast::{ConflictAction, Expr, InsertStatement, OnConflict};
use crate::error::Result;

// Typestate markers

/// Marker: No values specified yet.
#[derive(Debug, Clone, Copy)]
pub struct NoValues;
/// Marker: Values have been specified.
#[derive(Debug, Clone, Copy)]
pub struct HasValues;

/// An INSERT statement builder.
///
/// `build()` is only available once at least one row has been added.
#[derive(Debug, Clone)]
pub struct Insert<Values> {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Expr>>,
    on_conflict: Option<OnConflict>,
    _state: PhantomData<Values>,
}

/// Starts an INSERT into `table`.
#[must_use]
pub fn insert_into(table: &str) -> Insert<NoValues> {
    Insert::into_table(table)
}

impl Insert<NoValues> {
    /// Creates a new INSERT builder for `table`.
    #[must_use]
    pub fn into_table(table: &str) -> Self {
        Self {
            table: String::from(table),
            columns: vec![],
            rows: vec![],
            on_conflict: None,
            _state: PhantomData,
        }
    }

    /// Adds a row of values; the first row moves the builder to `HasValues`.
    ///
    /// Row arity is checked against the columns in `build()`.
    #[must_use]
    pub fn values<T: Into<Expr>>(self, row: impl IntoIterator<Item = T>) -> Insert<HasValues> {
        let mut rows = self.rows;
        rows.push(row.into_iter().map(Into::into).collect());
        Insert {
            table: self.table,
            columns: self.columns,
            rows,
            on_conflict: self.on_conflict,
            _state: PhantomData,
        }
    }
}

impl<Values> Insert<Values> {
    /// Specifies the columns to insert into.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Keeps the existing row when one conflicts on `target`.
    ///
    /// An empty `target` means any unique constraint.
    #[must_use]
    pub fn on_conflict_do_nothing(mut self, target: &[&str]) -> Self {
        self.on_conflict = Some(OnConflict {
            target: target.iter().map(|s| String::from(*s)).collect(),
            action: ConflictAction::DoNothing,
        });
        self
    }

    /// Overwrites `update` columns of the existing row when one conflicts
    /// on `target`.
    #[must_use]
    pub fn on_conflict_do_update(mut self, target: &[&str], update: &[&str]) -> Self {
        self.on_conflict = Some(OnConflict {
            target: target.iter().map(|s| String::from(*s)).collect(),
            action: ConflictAction::DoUpdate(update.iter().map(|s| String::from(*s)).collect()),
        });
        self
    }
}

impl Insert<HasValues> {
    /// Adds another row of values.
    #[must_use]
    pub fn values<T: Into<Expr>>(mut self, row: impl IntoIterator<Item = T>) -> Self {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedStatement`] when a row's arity differs
    /// from the column list, no columns were named, or the upsert clause is
    /// inconsistent.
    pub fn build(self) -> Result<InsertStatement> {
        let statement = InsertStatement {
            table: self.table,
            columns: self.columns,
            rows: self.rows,
            on_conflict: self.on_conflict,
        };
        statement.validate()?;
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::{SqlValue, ToSqlValue};
    use crate::error::Error;

    #[test]
    fn test_insert_multiple_rows() {
        let statement = insert_into("users")
            .columns(&["name", "age"])
            .values(["Alice".to_sql_value(), 30_i64.to_sql_value()])
            .values(["Bob".to_sql_value(), 25_i64.to_sql_value()])
            .build()
            .unwrap();
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(
            statement.rows[1],
            vec![
                Expr::Literal(SqlValue::Text(String::from("Bob"))),
                Expr::Literal(SqlValue::Int(25))
            ]
        );
    }

    #[test]
    fn test_insert_arity_mismatch() {
        let err = insert_into("users")
            .columns(&["name", "age"])
            .values(["Alice"])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedStatement(msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_upsert_clause() {
        let statement = insert_into("counters")
            .columns(&["key", "hits"])
            .values([Expr::from("home"), Expr::from(1_i64)])
            .on_conflict_do_update(&["key"], &["hits"])
            .build()
            .unwrap();
        assert_eq!(
            statement.on_conflict,
            Some(OnConflict {
                target: vec![String::from("key")],
                action: ConflictAction::DoUpdate(vec![String::from("hits")]),
            })
        );
    }
}
