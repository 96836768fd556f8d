//! DELETE statement builder.

use crate::ast::{DeleteStatement, Expr};
use crate::error::{Error, Result};

use super::combine_and;

/// A DELETE statement builder.
///
/// Without a WHERE predicate every row of the table is deleted; call
/// [`Delete::require_where`] to refuse that at build time.
#[derive(Debug, Clone)]
pub struct Delete {
    table: String,
    where_clause: Option<Expr>,
    require_where: bool,
}

/// Starts a DELETE from `table`.
#[must_use]
pub fn delete_from(table: &str) -> Delete {
    Delete::table(table)
}

impl Delete {
    /// Creates a new DELETE builder for `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: String::from(table),
            where_clause: None,
            require_where: false,
        }
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
    #[must_use]
    pub const fn require_where(mut self) -> Self {
        self.require_where = true;
        self
    }

    /// Returns true if a WHERE predicate has been added.
    #[must_use]
    pub const fn has_where_clause(&self) -> bool {
        self.where_clause.is_some()
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] when the table name is empty or
    /// `require_where` was set and no WHERE predicate was added.
    pub fn build(self) -> Result<DeleteStatement> {
        if self.require_where && self.where_clause.is_none() {
            return Err(Error::malformed(format!(
                "DELETE FROM {} requires a WHERE clause",
                self.table
            )));
        }
        let statement = DeleteStatement {
            table: self.table,
            where_clause: self.where_clause,
        };
        statement.validate()?;
        Ok(statement)
    }
}
