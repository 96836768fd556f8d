//! UPDATE statement builder.

use crate::ast::{Assignment, Expr, UpdateStatement};
use crate::error::{Error, Result};

use super::combine_and;

/// An UPDATE statement builder.
#[derive(Debug, Clone)]
pub struct Update {
    table: String,
    assignments: Vec<Assignment>,
    where_clause: Option<Expr>,
    require_where: bool,
}

/// Starts an UPDATE of `table`.
#[must_use]
pub fn update(table: &str) -> Update {
    Update::table(table)
}

impl Update {
    /// Creates a new UPDATE builder for `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: String::from(table),
            assignments: vec![],
            where_clause: None,
            require_where: false,
        }
    }

    /// Adds `column = value` to the SET clause.
    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Expr>) -> Self {
        self.assignments.push(Assignment {
            column: String::from(column),
            value: value.into(),
        });
        self
    }

    /// Adds a WHERE predicate. Repeated calls are combined with AND.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.where_clause = Some(combine_and(self.where_clause, expr));
        self
    }

    /// Adds a WHERE predicate only when one is given.
    #[must_use]
    pub fn where_opt(self, expr: Option<Expr>) -> Self {
        match expr {
            Some(expr) => self.where_clause(expr),
            None => self,
        }
    }

    /// OR-combines `expr` with the current WHERE predicate.
    #[must_use]
    pub fn or_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(current) => current.or(expr),
            None => expr,
        });
        self
    }

    /// Makes `build()` fail unless a WHERE predicate was added.
    ///
    /// Useful when every predicate comes from optional filters and an empty
    /// filter set must not turn into a table-wide update.
    #[must_use]
    pub const fn require_where(mut self) -> Self {
        self.require_where = true;
        self
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] when there are no assignments,
    /// the table name is empty, or `require_where` was set and no WHERE
    /// predicate was added.
    pub fn build(self) -> Result<UpdateStatement> {
        if self.require_where && self.where_clause.is_none() {
            return Err(Error::malformed(format!(
                "UPDATE {} requires a WHERE clause",
                self.table
            )));
        }
        let statement = UpdateStatement {
            table: self.table,
            assignments: self.assignments,
            where_clause: self.where_clause,
        };
        statement.validate()?;
        Ok(statement)
    }
}
