//! Structural validation.
//!
//! Builders run these checks in `build()`, and the renderer runs them again
//! so that hand-assembled statements are held to the same rules.

use crate::error::{Error, Result};

use super::expression::{Comparison, Expr, InList, LogicalOp};
use super::statement::{
    ConflictAction, DeleteStatement, InsertStatement, Projection, SelectStatement, Statement,
    TableRef, UpdateStatement,
};

impl Statement {
    /// Checks the structural rules of the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Select(s) => s.validate(),
            Self::Insert(s) => s.validate(),
            Self::Update(s) => s.validate(),
            Self::Delete(s) => s.validate(),
        }
    }
}

impl SelectStatement {
    /// Checks the structural rules of the query and every nested query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.projections.is_empty() {
            return Err(Error::malformed("SELECT requires at least one projection"));
        }
        for projection in &self.projections {
            validate_projection(projection)?;
        }
        validate_table_ref(&self.from)?;
        for join in &self.joins {
            validate_table_ref(&join.table)?;
            validate_expr(&join.on)?;
        }
        if let Some(expr) = &self.where_clause {
            validate_expr(expr)?;
        }
        for expr in &self.group_by {
            validate_expr(expr)?;
        }
        if let Some(expr) = &self.having {
            validate_expr(expr)?;
        }
        for member in &self.unions {
            let query = &member.query;
            if !query.order_by.is_empty() || query.limit.is_some() || query.offset.is_some() {
                return Err(Error::malformed(
                    "a UNION member cannot have its own ORDER BY, LIMIT or OFFSET",
                ));
            }
            if !query.unions.is_empty() {
                return Err(Error::malformed("a UNION member cannot itself have UNION members"));
            }
            query.validate()?;
        }
        for order in &self.order_by {
            validate_expr(&order.expr)?;
        }
        Ok(())
    }
}

impl InsertStatement {
    /// Checks table, columns, row arity and the upsert clause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        validate_table_name("INSERT", &self.table)?;
        if self.columns.is_empty() {
            return Err(Error::malformed("INSERT requires at least one column"));
        }
        for column in &self.columns {
            validate_identifier("column", column)?;
        }
        if self.rows.is_empty() {
            return Err(Error::malformed("INSERT requires at least one row of values"));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(Error::malformed(format!(
                    "INSERT row {} has {} values but {} columns were named",
                    i + 1,
                    row.len(),
                    self.columns.len()
                )));
            }
            for expr in row {
                validate_expr(expr)?;
            }
        }
        if let Some(on_conflict) = &self.on_conflict {
            for column in &on_conflict.target {
                validate_identifier("conflict target column", column)?;
            }
            if let ConflictAction::DoUpdate(update) = &on_conflict.action {
                if on_conflict.target.is_empty() {
                    return Err(Error::malformed(
                        "an upsert that updates on conflict requires a conflict target",
                    ));
                }
                if update.is_empty() {
                    return Err(Error::malformed(
                        "an upsert that updates on conflict requires at least one column to update",
                    ));
                }
                if let Some(unknown) = update.iter().find(|c| !self.columns.contains(c)) {
                    return Err(Error::malformed(format!(
                        "upsert updates column '{unknown}' which is not inserted"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl UpdateStatement {
    /// Checks table and assignments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        validate_table_name("UPDATE", &self.table)?;
        if self.assignments.is_empty() {
            return Err(Error::malformed("UPDATE requires at least one assignment"));
        }
        for assignment in &self.assignments {
            validate_identifier("column", &assignment.column)?;
            validate_expr(&assignment.value)?;
        }
        if let Some(expr) = &self.where_clause {
            validate_expr(expr)?;
        }
        Ok(())
    }
}

impl DeleteStatement {
    /// Checks the table and WHERE clause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        validate_table_name("DELETE", &self.table)?;
        if let Some(expr) = &self.where_clause {
            validate_expr(expr)?;
        }
        Ok(())
    }
}

fn validate_table_name(statement: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::malformed(format!(
            "{statement} requires a non-empty table name"
        )));
    }
    Ok(())
}

fn validate_identifier(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::malformed(format!("{what} name cannot be empty")));
    }
    Ok(())
}

fn validate_projection(projection: &Projection) -> Result<()> {
    if let Some(alias) = &projection.alias {
        validate_identifier("column alias", alias)?;
    }
    validate_expr(&projection.expr)
}

fn validate_table_ref(table: &TableRef) -> Result<()> {
    match table {
        TableRef::Table { name, alias } => {
            validate_identifier("table", name)?;
            if let Some(alias) = alias {
                validate_identifier("table alias", alias)?;
            }
            Ok(())
        }
        TableRef::Subquery { query, alias } => {
            if alias.is_empty() {
                return Err(Error::malformed("a derived table requires an alias"));
            }
            query.validate()
        }
    }
}

/// Plain identifier: ASCII letters, digits and underscores, not starting
/// with a digit.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_expr(expr: &Expr) -> Result<()> {
    match expr {
        Expr::Literal(_) => Ok(()),
        Expr::Column(column) => {
            if let Some(table) = &column.table {
                validate_identifier("column qualifier", table)?;
            }
            validate_identifier("column", &column.name)
        }
        Expr::Wildcard { table } => match table {
            Some(table) => validate_identifier("wildcard qualifier", table),
            None => Ok(()),
        },
        Expr::Comparison(comparison) => validate_comparison(comparison),
        Expr::Logical { op, operands } => {
            match op {
                LogicalOp::And | LogicalOp::Or if operands.is_empty() => {
                    return Err(Error::malformed(format!(
                        "{} requires at least one operand",
                        op.as_str()
                    )));
                }
                LogicalOp::Not if operands.len() != 1 => {
                    return Err(Error::malformed(format!(
                        "NOT requires exactly one operand, got {}",
                        operands.len()
                    )));
                }
                _ => {}
            }
            operands.iter().try_for_each(validate_expr)
        }
        Expr::Function(call) => {
            if !is_plain_identifier(&call.name) {
                return Err(Error::malformed(format!(
                    "invalid function name '{}'",
                    call.name
                )));
            }
            call.args.iter().try_for_each(validate_expr)
        }
        Expr::Subquery(query) | Expr::Exists { query, .. } => query.validate(),
    }
}

fn validate_comparison(comparison: &Comparison) -> Result<()> {
    match comparison {
        Comparison::Binary { left, right, .. } => {
            validate_expr(left)?;
            validate_expr(right)
        }
        Comparison::In { expr, list, .. } => {
            validate_expr(expr)?;
            match list {
                InList::Values(values) => {
                    if values.is_empty() {
                        return Err(Error::malformed("IN requires at least one value"));
                    }
                    values.iter().try_for_each(validate_expr)
                }
                InList::Subquery(query) => query.validate(),
            }
        }
        Comparison::IsNull { expr, .. } => validate_expr(expr),
        Comparison::Between {
            expr, low, high, ..
        } => {
            validate_expr(expr)?;
            validate_expr(low)?;
            validate_expr(high)
        }
    }
}
