//! Dialect-aware rendering.
//!
//! Rendering is a pure function of a statement and a [`Dialect`]: every
//! literal becomes the dialect's placeholder for the next 1-based index and
//! its value is appended to the parameter list, so placeholder N always
//! binds `params[N - 1]`. Identifiers are quoted only where the dialect
//! requires it.

mod scope;

use std::fmt;
use std::ops::Range;

use tracing::{debug, warn};

use crate::ast::{
    ColumnRef, Comparison, DeleteStatement, Expr, InList, InsertStatement, JoinType, LogicalOp,
    OrderDirection, SelectStatement, Statement, TableRef, UpdateStatement,
};
use crate::builder::value::SqlValue;
use crate::dialect::Dialect;
use crate::error::{Error, Result};

use scope::Scopes;

/// SQL text plus its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSql {
    sql: String,
    params: Vec<SqlValue>,
    placeholders: Vec<Range<usize>>,
}

impl RenderedSql {
    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bind parameters; `params()[i]` binds placeholder `i + 1`.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Splits into SQL text and parameters for a database client.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }

    /// Returns the SQL with every placeholder replaced by its escaped value.
    ///
    /// **Warning**: for logging and debugging only. Never execute the result.
    #[must_use]
    pub fn to_inline_sql(&self, dialect: &dyn Dialect) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut last = 0;
        for (span, value) in self.placeholders.iter().zip(&self.params) {
            out.push_str(&self.sql[last..span.start]);
            out.push_str(&value.to_sql_inline(dialect));
            last = span.end;
        }
        out.push_str(&self.sql[last..]);
        out
    }
}

impl fmt::Display for RenderedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Renders `statement` for `dialect`.
///
/// # Errors
///
/// - [`Error::MalformedStatement`] if the statement breaks a structural rule.
/// - [`Error::UnresolvedColumn`] if a qualified column names no table or
///   alias in scope.
/// - [`Error::UnsupportedConstruct`] if the dialect cannot express part of
///   the statement.
pub fn render(statement: &Statement, dialect: &dyn Dialect) -> Result<RenderedSql> {
    match statement {
        Statement::Select(s) => s.render(dialect),
        Statement::Insert(s) => s.render(dialect),
        Statement::Update(s) => s.render(dialect),
        Statement::Delete(s) => s.render(dialect),
    }
}

impl Statement {
    /// Renders this statement for `dialect`. See [`render`].
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self, dialect: &dyn Dialect) -> Result<RenderedSql> {
        render(self, dialect)
    }
}

impl SelectStatement {
    /// Renders this query for `dialect`. See [`render`].
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self, dialect: &dyn Dialect) -> Result<RenderedSql> {
        self.validate()?;
        run("SELECT", dialect, |r| r.select(self))
    }
}

impl InsertStatement {
    /// Renders this statement for `dialect`. See [`render`].
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self, dialect: &dyn Dialect) -> Result<RenderedSql> {
        self.validate()?;
        run("INSERT", dialect, |r| r.insert(self))
    }
}

impl UpdateStatement {
    /// Renders this statement for `dialect`. See [`render`].
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self, dialect: &dyn Dialect) -> Result<RenderedSql> {
        self.validate()?;
        run("UPDATE", dialect, |r| r.update(self))
    }
}

impl DeleteStatement {
    /// Renders this statement for `dialect`. See [`render`].
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self, dialect: &dyn Dialect) -> Result<RenderedSql> {
        self.validate()?;
        run("DELETE", dialect, |r| r.delete(self))
    }
}

fn run<'a>(
    kind: &'static str,
    dialect: &'a dyn Dialect,
    body: impl FnOnce(&mut Renderer<'a>) -> Result<()>,
) -> Result<RenderedSql> {
    let mut renderer = Renderer {
        dialect,
        sql: String::new(),
        params: Vec::new(),
        placeholders: Vec::new(),
        scopes: Scopes::default(),
    };
    body(&mut renderer)?;
    debug!(
        dialect = dialect.name(),
        statement = kind,
        params = renderer.params.len(),
        sql = %renderer.sql,
        "rendered statement"
    );
    Ok(RenderedSql {
        sql: renderer.sql,
        params: renderer.params,
        placeholders: renderer.placeholders,
    })
}

struct Renderer<'a> {
    dialect: &'a dyn Dialect,
    sql: String,
    params: Vec<SqlValue>,
    placeholders: Vec<Range<usize>>,
    scopes: Scopes<'a>,
}

impl<'a> Renderer<'a> {
    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn identifier(&mut self, name: &str) {
        let quoted = self.dialect.quote_identifier(name);
        self.sql.push_str(&quoted);
    }

    fn bind(&mut self, value: &SqlValue) {
        let placeholder = self.dialect.placeholder(self.params.len() + 1);
        let start = self.sql.len();
        self.sql.push_str(&placeholder);
        self.placeholders.push(start..self.sql.len());
        self.params.push(value.clone());
    }

    fn comma_separated<T>(
        &mut self,
        items: &'a [T],
        mut each: impl FnMut(&mut Self, &'a T) -> Result<()>,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            each(self, item)?;
        }
        Ok(())
    }

    // SELECT

    fn select(&mut self, query: &'a SelectStatement) -> Result<()> {
        self.scopes.push_select(query);
        self.select_core(query)?;

        // Compound members see enclosing scopes but not the head's sources.
        let head = self.scopes.pop();
        for member in &query.unions {
            self.push(" ");
            self.push(member.operator.as_str());
            self.push(" ");
            self.select(&member.query)?;
        }
        self.scopes.restore(head);

        if !query.order_by.is_empty() {
            self.push(" ORDER BY ");
            self.comma_separated(&query.order_by, |r, order| {
                r.expr(&order.expr)?;
                if order.direction == OrderDirection::Desc {
                    r.push(" DESC");
                }
                Ok(())
            })?;
        }
        if let Some(clause) = self.dialect.render_pagination(query.limit, query.offset)? {
            self.push(" ");
            self.push(&clause);
        }

        self.scopes.pop();
        Ok(())
    }

    fn select_core(&mut self, query: &'a SelectStatement) -> Result<()> {
        self.push("SELECT ");
        if query.distinct {
            self.push("DISTINCT ");
        }
        self.comma_separated(&query.projections, |r, projection| {
            r.expr(&projection.expr)?;
            if let Some(alias) = &projection.alias {
                r.push(" AS ");
                r.identifier(alias);
            }
            Ok(())
        })?;

        self.push(" FROM ");
        self.table_ref(&query.from)?;

        for join in &query.joins {
            if join.join_type == JoinType::Full && !self.dialect.supports_full_join() {
                return Err(Error::unsupported(self.dialect, "FULL JOIN"));
            }
            self.push(" ");
            self.push(join.join_type.as_str());
            self.push(" ");
            self.table_ref(&join.table)?;
            self.push(" ON ");
            self.expr(&join.on)?;
        }

        if let Some(predicate) = &query.where_clause {
            self.push(" WHERE ");
            self.expr(predicate)?;
        }
        if !query.group_by.is_empty() {
            self.push(" GROUP BY ");
            self.comma_separated(&query.group_by, Self::expr)?;
        }
        if let Some(predicate) = &query.having {
            self.push(" HAVING ");
            self.expr(predicate)?;
        }
        Ok(())
    }

    fn table_ref(&mut self, table: &'a TableRef) -> Result<()> {
        match table {
            TableRef::Table { name, alias } => {
                self.identifier(name);
                if let Some(alias) = alias {
                    self.push(" AS ");
                    self.identifier(alias);
                }
            }
            TableRef::Subquery { query, alias } => {
                // A derived table is not LATERAL: it cannot see its siblings.
                let current = self.scopes.pop();
                self.push("(");
                self.select(query)?;
                self.scopes.restore(current);
                self.push(") AS ");
                self.identifier(alias);
            }
        }
        Ok(())
    }

    // DML

    fn insert(&mut self, statement: &'a InsertStatement) -> Result<()> {
        let upsert = statement
            .on_conflict
            .as_ref()
            .map(|on_conflict| self.dialect.render_upsert(on_conflict))
            .transpose()?;

        self.push(upsert.as_ref().map_or("INSERT INTO", |u| u.insert));
        self.push(" ");
        self.identifier(&statement.table);
        self.push(" (");
        for (i, column) in statement.columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.identifier(column);
        }
        self.push(") VALUES ");

        self.scopes.push_table(&statement.table);
        self.comma_separated(&statement.rows, |r, row| {
            r.push("(");
            r.comma_separated(row, Self::expr)?;
            r.push(")");
            Ok(())
        })?;
        self.scopes.pop();

        if let Some(suffix) = upsert.and_then(|u| u.suffix) {
            self.push(" ");
            self.push(&suffix);
        }
        Ok(())
    }

    fn update(&mut self, statement: &'a UpdateStatement) -> Result<()> {
        self.push("UPDATE ");
        self.identifier(&statement.table);
        self.push(" SET ");

        self.scopes.push_table(&statement.table);
        self.comma_separated(&statement.assignments, |r, assignment| {
            r.identifier(&assignment.column);
            r.push(" = ");
            r.expr(&assignment.value)
        })?;
        self.where_or_warn("UPDATE", &statement.table, statement.where_clause.as_ref())?;
        self.scopes.pop();
        Ok(())
    }

    fn delete(&mut self, statement: &'a DeleteStatement) -> Result<()> {
        self.push("DELETE FROM ");
        self.identifier(&statement.table);

        self.scopes.push_table(&statement.table);
        self.where_or_warn("DELETE", &statement.table, statement.where_clause.as_ref())?;
        self.scopes.pop();
        Ok(())
    }

    fn where_or_warn(&mut self, kind: &str, table: &str, predicate: Option<&'a Expr>) -> Result<()> {
        match predicate {
            Some(predicate) => {
                self.push(" WHERE ");
                self.expr(predicate)
            }
            None => {
                warn!(statement = kind, table, "statement has no WHERE clause and affects every row");
                Ok(())
            }
        }
    }

    // Expressions

    fn expr(&mut self, expr: &'a Expr) -> Result<()> {
        match expr {
            Expr::Literal(value) => {
                self.bind(value);
                Ok(())
            }
            Expr::Column(column) => self.column(column),
            Expr::Wildcard { table } => {
                if let Some(table) = table {
                    self.check_qualifier(table, "*")?;
                    self.identifier(table);
                    self.push(".");
                }
                self.push("*");
                Ok(())
            }
            Expr::Comparison(comparison) => self.comparison(comparison),
            Expr::Logical { op, operands } => self.logical(*op, operands),
            Expr::Function(call) => {
                self.push(&call.name);
                self.push("(");
                if call.distinct {
                    self.push("DISTINCT ");
                }
                self.comma_separated(&call.args, Self::expr)?;
                self.push(")");
                Ok(())
            }
            Expr::Subquery(query) => self.subquery(query),
            Expr::Exists { query, negated } => {
                self.push(if *negated { "NOT EXISTS " } else { "EXISTS " });
                self.subquery(query)
            }
        }
    }

    fn subquery(&mut self, query: &'a SelectStatement) -> Result<()> {
        self.push("(");
        self.select(query)?;
        self.push(")");
        Ok(())
    }

    fn check_qualifier(&self, qualifier: &str, column: &str) -> Result<()> {
        if self.scopes.resolves(qualifier) {
            Ok(())
        } else {
            Err(Error::UnresolvedColumn {
                qualifier: String::from(qualifier),
                column: String::from(column),
            })
        }
    }

    fn column(&mut self, column: &ColumnRef) -> Result<()> {
        if let Some(table) = &column.table {
            self.check_qualifier(table, &column.name)?;
            self.identifier(table);
            self.push(".");
        }
        self.identifier(&column.name);
        Ok(())
    }

    fn logical(&mut self, op: LogicalOp, operands: &'a [Expr]) -> Result<()> {
        match (op, operands) {
            (LogicalOp::Not, [operand]) => {
                self.push("NOT ");
                self.operand(operand)
            }
            (LogicalOp::Not, _) => Err(Error::malformed("NOT requires exactly one operand")),
            (_, [only]) => self.expr(only),
            _ => {
                let separator = if op == LogicalOp::And { " AND " } else { " OR " };
                for (i, child) in operands.iter().enumerate() {
                    if i > 0 {
                        self.push(separator);
                    }
                    let child = child.unwrap_single();
                    // Same-kind children flatten; anything else that binds
                    // looser than a comparison is grouped.
                    let group = matches!(child, Expr::Logical { op: child_op, .. } if *child_op != op);
                    if group {
                        self.push("(");
                        self.expr(child)?;
                        self.push(")");
                    } else {
                        self.expr(child)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Renders an operand of a comparison or NOT, grouping nested
    /// predicates.
    fn operand(&mut self, expr: &'a Expr) -> Result<()> {
        let expr = expr.unwrap_single();
        if matches!(expr, Expr::Logical { .. } | Expr::Comparison(_)) {
            self.push("(");
            self.expr(expr)?;
            self.push(")");
            Ok(())
        } else {
            self.expr(expr)
        }
    }

    fn comparison(&mut self, comparison: &'a Comparison) -> Result<()> {
        match comparison {
            Comparison::Binary { left, op, right } => {
                self.operand(left)?;
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.operand(right)
            }
            Comparison::In {
                expr,
                list,
                negated,
            } => {
                self.operand(expr)?;
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                match list {
                    InList::Values(values) => {
                        for (i, value) in values.iter().enumerate() {
                            if i > 0 {
                                self.push(", ");
                            }
                            self.operand(value)?;
                        }
                    }
                    InList::Subquery(query) => self.select(query)?,
                }
                self.push(")");
                Ok(())
            }
            Comparison::IsNull { expr, negated } => {
                self.operand(expr)?;
                self.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
            Comparison::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.operand(expr)?;
                self.push(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                self.operand(low)?;
                self.push(" AND ");
                self.operand(high)
            }
        }
    }
}
