//! SELECT statement builder using the typestate pattern.
//!
//! A query without a FROM clause does not compile: `join`, `where_clause`
//! and `build` only exist once `from` has been called.

use std::marker::PhantomData;

use crate::ast::{
    CompoundMember, Expr, Join, JoinType, OrderBy, OrderDirection, Projection, SelectStatement,
    SetOperator, TableRef,
};
use crate::error::{Error, Result};

use super::combine_and;

// Typestate markers (zero-sized types)

/// Marker: No FROM clause specified yet.
#[derive(Debug, Clone, Copy)]
pub struct NoFrom;
/// Marker: FROM clause has been specified.
#[derive(Debug, Clone, Copy)]
pub struct HasFrom;

/// A SELECT statement builder.
///
/// Every method consumes the builder and returns the next one; clone the
/// builder to branch a partially built query.
#[derive(Debug, Clone)]
pub struct Select<From> {
    distinct: bool,
    projections: Vec<Projection>,
    from: Option<TableRef>,
    joins: Vec<Join>,
    where_clause: Option<Expr>,
    group_by: Vec<Expr>,
    having: Option<Expr>,
    unions: Vec<CompoundMember>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    _state: PhantomData<From>,
}

/// Starts a SELECT with the given projections.
///
/// ```rust
/// use sqlweave::builder::{col, count_all, select};
///
/// let query = select([col("status"), count_all()])
///     .from("orders")
///     .group_by(&["status"])
///     .build()
///     .unwrap();
/// assert_eq!(query.projections.len(), 2);
/// ```
#[must_use]
pub fn select<P: Into<Projection>>(projections: impl IntoIterator<Item = P>) -> Select<NoFrom> {
    Select::new().project(projections)
}

impl Select<NoFrom> {
    /// Creates a new SELECT builder with no projections.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            distinct: false,
            projections: Vec::new(),
            from: None,
            joins: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            unions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _state: PhantomData,
        }
    }

    /// Specifies the table to select from.
    #[must_use]
    pub fn from(self, table: impl Into<TableRef>) -> Select<HasFrom> {
        Select {
            distinct: self.distinct,
            projections: self.projections,
            from: Some(table.into()),
            joins: self.joins,
            where_clause: self.where_clause,
            group_by: self.group_by,
            having: self.having,
            unions: self.unions,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }

    /// Specifies an aliased table to select from.
    #[must_use]
    pub fn from_as(self, table: &str, alias: &str) -> Select<HasFrom> {
        self.from(TableRef::table(table).alias(alias))
    }

    /// Selects from a derived table.
    #[must_use]
    pub fn from_subquery(self, query: SelectStatement, alias: &str) -> Select<HasFrom> {
        self.from(TableRef::subquery(query, alias))
    }
}

impl Default for Select<NoFrom> {
    fn default() -> Self {
        Self::new()
    }
}

// Projections can be added before or after FROM.
impl<From> Select<From> {
    /// Adds columns by name; `"*"` and `"t.*"` select all columns.
    #[must_use]
    pub fn columns(self, cols: &[&str]) -> Self {
        self.project(cols.iter().copied())
    }

    /// Adds projections.
    #[must_use]
    pub fn project<P: Into<Projection>>(mut self, projections: impl IntoIterator<Item = P>) -> Self {
        self.projections
            .extend(projections.into_iter().map(Into::into));
        self
    }

    /// Adds one projection.
    #[must_use]
    pub fn column(mut self, projection: impl Into<Projection>) -> Self {
        self.projections.push(projection.into());
        self
    }

    /// Adds an aliased projection.
    #[must_use]
    pub fn column_as(self, expr: Expr, alias: &str) -> Self {
        self.column(expr.alias(alias))
    }

    /// Selects all columns (*).
    #[must_use]
    pub fn select_all(self) -> Self {
        self.column(Expr::Wildcard { table: None })
    }

    /// Adds DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

// Methods available after FROM
impl Select<HasFrom> {
    fn join_with(mut self, join_type: JoinType, table: impl Into<TableRef>, on: Expr) -> Self {
        self.joins.push(Join {
            join_type,
            table: table.into(),
            on,
        });
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join_with(JoinType::Inner, table, on)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join_with(JoinType::Left, table, on)
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join_with(JoinType::Right, table, on)
    }

    /// Adds a FULL JOIN. Not every dialect can render it.
    #[must_use]
    pub fn full_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join_with(JoinType::Full, table, on)
    }

    /// Adds a WHERE predicate. Repeated calls are combined with AND.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.where_clause = Some(combine_and(self.where_clause, expr));
        self
    }

    /// Adds a WHERE predicate only when one is given.
    ///
    /// Handy for search forms where every filter is optional.
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

    /// Adds GROUP BY columns by name.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by.extend(cols.iter().map(|c| Expr::column(c)));
        self
    }

    /// Adds a GROUP BY expression.
    #[must_use]
    pub fn group_by_expr(mut self, expr: Expr) -> Self {
        self.group_by.push(expr);
        self
    }

    /// Adds a HAVING predicate. Repeated calls are combined with AND.
    #[must_use]
    pub fn having(mut self, expr: Expr) -> Self {
        self.having = Some(combine_and(self.having, expr));
        self
    }

    /// Adds ascending ORDER BY columns.
    #[must_use]
    pub fn order_by(self, cols: &[&str]) -> Self {
        cols.iter().fold(self, |query, c| {
            query.order_by_expr(Expr::column(c), OrderDirection::Asc)
        })
    }

    /// Adds descending ORDER BY columns.
    #[must_use]
    pub fn order_by_desc(self, cols: &[&str]) -> Self {
        cols.iter().fold(self, |query, c| {
            query.order_by_expr(Expr::column(c), OrderDirection::Desc)
        })
    }

    /// Adds an ORDER BY expression.
    #[must_use]
    pub fn order_by_expr(mut self, expr: Expr, direction: OrderDirection) -> Self {
        self.order_by.push(OrderBy { expr, direction });
        self
    }

    /// Adds a LIMIT clause.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Adds an OFFSET clause.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Appends `query` with UNION.
    #[must_use]
    pub fn union(mut self, query: SelectStatement) -> Self {
        self.unions.push(CompoundMember {
            operator: SetOperator::Union,
            query,
        });
        self
    }

    /// Appends `query` with UNION ALL.
    #[must_use]
    pub fn union_all(mut self, query: SelectStatement) -> Self {
        self.unions.push(CompoundMember {
            operator: SetOperator::UnionAll,
            query,
        });
        self
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] when the query has no
    /// projections or any part of it is structurally invalid.
    pub fn build(self) -> Result<SelectStatement> {
        let from = self
            .from
            .ok_or_else(|| Error::malformed("SELECT requires a FROM clause"))?;
        let statement = SelectStatement {
            distinct: self.distinct,
            projections: self.projections,
            from,
            joins: self.joins,
            where_clause: self.where_clause,
            group_by: self.group_by,
            having: self.having,
            unions: self.unions,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
        };
        statement.validate()?;
        Ok(statement)
    }
}
