//! SQL statement types.

use super::expression::{Expr, FunctionCall};
use crate::error::{Error, Result};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The type of join.
    pub join_type: JoinType,
    /// The joined table.
    pub table: TableRef,
    /// The join condition.
    pub on: Expr,
}

/// A row source in a FROM or JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A named table.
    Table {
        /// Table name.
        name: String,
        /// Alias.
        alias: Option<String>,
    },
    /// A derived table.
    Subquery {
        /// The subquery.
        query: Box<SelectStatement>,
        /// Alias (required for derived tables).
        alias: String,
    },
}

impl TableRef {
    /// Creates a simple table reference.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            name: name.into(),
            alias: None,
        }
    }

    /// Creates a derived table from a subquery.
    #[must_use]
    pub fn subquery(query: SelectStatement, alias: impl Into<String>) -> Self {
        Self::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    /// Adds or replaces the alias of this table reference.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        match self {
            Self::Table { name, .. } => Self::Table {
                name,
                alias: Some(alias.into()),
            },
            Self::Subquery { query, .. } => Self::Subquery {
                query,
                alias: alias.into(),
            },
        }
    }

    /// Returns true if a column qualifier may refer to this source.
    ///
    /// A named table answers to both its name and its alias; a derived
    /// table only to its alias. Matching ignores ASCII case.
    #[must_use]
    pub fn answers_to(&self, qualifier: &str) -> bool {
        match self {
            Self::Table { name, alias } => {
                name.eq_ignore_ascii_case(qualifier)
                    || alias
                        .as_deref()
                        .is_some_and(|a| a.eq_ignore_ascii_case(qualifier))
            }
            Self::Subquery { alias, .. } => alias.eq_ignore_ascii_case(qualifier),
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        Self::table(name)
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        Self::table(name)
    }
}

/// A projected expression with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<String>,
}

impl Projection {
    /// Creates an unaliased projection.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    /// Sets the column alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<Expr> for Projection {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

/// `"*"`, `"t.*"`, `"col"` or `"t.col"`.
impl From<&str> for Projection {
    fn from(reference: &str) -> Self {
        if reference == "*" {
            return Self::new(Expr::Wildcard { table: None });
        }
        if let Some(table) = reference.strip_suffix(".*") {
            return Self::new(Expr::Wildcard {
                table: Some(String::from(table)),
            });
        }
        Self::new(Expr::column(reference))
    }
}

/// Set operators joining compound SELECT members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    /// UNION (duplicates removed).
    Union,
    /// UNION ALL.
    UnionAll,
}

impl SetOperator {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
        }
    }
}

/// A SELECT appended to another with UNION or UNION ALL.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundMember {
    /// The set operator placed before this member.
    pub operator: SetOperator,
    /// The member query.
    pub query: SelectStatement,
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The projected columns.
    pub projections: Vec<Projection>,
    /// The FROM clause.
    pub from: TableRef,
    /// JOIN clauses, in order.
    pub joins: Vec<Join>,
    /// The WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// UNION / UNION ALL members.
    pub unions: Vec<CompoundMember>,
    /// ORDER BY clauses. For a compound query they order the whole result.
    pub order_by: Vec<OrderBy>,
    /// LIMIT clause.
    pub limit: Option<u64>,
    /// OFFSET clause.
    pub offset: Option<u64>,
}

impl SelectStatement {
    /// Creates a SELECT with the given projections and source and every
    /// other clause empty.
    #[must_use]
    pub const fn new(projections: Vec<Projection>, from: TableRef) -> Self {
        Self {
            distinct: false,
            projections,
            from,
            joins: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            unions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Returns the statement counting the rows this query would return,
    /// ignoring its ORDER BY and pagination.
    ///
    /// Grouped, distinct or compound queries are wrapped in a derived table
    /// `t`; anything else has its projections replaced by `COUNT(*)`.
    #[must_use]
    pub fn count_rows(&self) -> Self {
        let mut base = self.clone();
        base.order_by.clear();
        base.limit = None;
        base.offset = None;

        let count = Projection::new(Expr::Function(FunctionCall {
            name: String::from("COUNT"),
            args: vec![Expr::Wildcard { table: None }],
            distinct: false,
        }));

        let needs_wrap = base.distinct
            || !base.group_by.is_empty()
            || base.having.is_some()
            || !base.unions.is_empty();
        if needs_wrap {
            Self::new(vec![count], TableRef::subquery(base, "t"))
        } else {
            base.projections = vec![count];
            base
        }
    }

    /// Returns a one-row statement computing `columns`, usually aggregates,
    /// over every row this query filters.
    ///
    /// FROM, JOINs and WHERE are kept; projections, DISTINCT, GROUP BY,
    /// UNION members and ORDER BY are dropped and the result is limited to
    /// one row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] if `columns` is empty or the
    /// query has a HAVING clause, whose groups only
    /// [`summary_over_groups`](Self::summary_over_groups) can summarise.
    pub fn summary<P: Into<Projection>>(
        &self,
        columns: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        if self.having.is_some() {
            return Err(Error::malformed(
                "summary of a query with HAVING needs final columns over its groups",
            ));
        }
        let mut base = self.filtered(columns)?;
        base.group_by.clear();
        base.limit = Some(1);
        Ok(base)
    }

    /// Returns a one-row statement summarising the groups this query keeps.
    ///
    /// The query's sources, WHERE, GROUP BY and HAVING project `columns` in
    /// a derived table `t`, and `final_columns` are computed over it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStatement`] if either column list is empty
    /// or the query has no GROUP BY.
    pub fn summary_over_groups<P, F>(
        &self,
        columns: impl IntoIterator<Item = P>,
        final_columns: impl IntoIterator<Item = F>,
    ) -> Result<Self>
    where
        P: Into<Projection>,
        F: Into<Projection>,
    {
        if self.group_by.is_empty() {
            return Err(Error::malformed("summary over groups requires a GROUP BY"));
        }
        let final_columns: Vec<Projection> = final_columns.into_iter().map(Into::into).collect();
        if final_columns.is_empty() {
            return Err(Error::malformed("summary over groups needs at least one final column"));
        }
        let grouped = self.filtered(columns)?;
        let mut outer = Self::new(final_columns, TableRef::subquery(grouped, "t"));
        outer.limit = Some(1);
        Ok(outer)
    }

    fn filtered<P: Into<Projection>>(&self, columns: impl IntoIterator<Item = P>) -> Result<Self> {
        let projections: Vec<Projection> = columns.into_iter().map(Into::into).collect();
        if projections.is_empty() {
            return Err(Error::malformed("summary needs at least one column"));
        }
        let mut base = self.clone();
        base.projections = projections;
        base.distinct = false;
        base.unions.clear();
        base.order_by.clear();
        base.limit = None;
        base.offset = None;
        Ok(base)
    }
}

/// A column assignment in UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Column name.
    pub column: String,
    /// The new value.
    pub value: Expr,
}

/// What an upsert does with a row that hits the conflict target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    /// Keep the existing row.
    DoNothing,
    /// Overwrite the listed columns with the incoming values.
    DoUpdate(Vec<String>),
}

/// Upsert clause of an INSERT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflict {
    /// Columns of the unique constraint that detects the conflict.
    pub target: Vec<String>,
    /// What to do on conflict.
    pub action: ConflictAction,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table.
    pub table: String,
    /// Column names.
    pub columns: Vec<String>,
    /// Value rows; each has one expression per column.
    pub rows: Vec<Vec<Expr>>,
    /// Upsert behaviour.
    pub on_conflict: Option<OnConflict>,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table.
    pub table: String,
    /// SET assignments, in order.
    pub assignments: Vec<Assignment>,
    /// The WHERE clause; `None` updates every row.
    pub where_clause: Option<Expr>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table.
    pub table: String,
    /// The WHERE clause; `None` deletes every row.
    pub where_clause: Option<Expr>,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
}

impl Statement {
    /// Returns the statement keyword, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "SELECT",
            Self::Insert(_) => "INSERT",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
        }
    }
}

impl From<SelectStatement> for Statement {
    fn from(statement: SelectStatement) -> Self {
        Self::Select(statement)
    }
}

impl From<InsertStatement> for Statement {
    fn from(statement: InsertStatement) -> Self {
        Self::Insert(statement)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(statement: UpdateStatement) -> Self {
        Self::Update(statement)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(statement: DeleteStatement) -> Self {
        Self::Delete(statement)
    }
}
