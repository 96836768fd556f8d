//! Expression tree types.
//!
//! Expressions are plain immutable values. Building a predicate never
//! mutates its inputs, so a sub-predicate can be cloned into any number of
//! statements.

use crate::builder::value::SqlValue;

use super::statement::SelectStatement;

/// A column reference, optionally qualified by a table name or alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Table name or alias qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl ColumnRef {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a column reference qualified by a table name or alias.
    #[must_use]
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Parses `"name"` or `"qualifier.name"`, splitting at the first dot.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('.') {
            Some((table, name)) => Self::qualified(table, name),
            None => Self::new(reference),
        }
    }
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

/// Right-hand side of an IN comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    /// `IN (a, b, c)`.
    Values(Vec<Expr>),
    /// `IN (SELECT ...)`.
    Subquery(Box<SelectStatement>),
}

/// A comparison producing a boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// `left op right`.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// `expr [NOT] IN (...)`.
    In {
        expr: Box<Expr>,
        list: InList,
        negated: bool,
    },
    /// `expr IS [NOT] NULL`.
    IsNull { expr: Box<Expr>, negated: bool },
    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
}

/// Logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    /// Returns the SQL keyword for the connective.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name, rendered as given.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value; always rendered as a bind parameter.
    Literal(SqlValue),
    /// A column reference.
    Column(ColumnRef),
    /// A comparison.
    Comparison(Comparison),
    /// AND/OR over one or more operands, or NOT over exactly one.
    Logical { op: LogicalOp, operands: Vec<Self> },
    /// A function call.
    Function(FunctionCall),
    /// A scalar subquery.
    Subquery(Box<SelectStatement>),
    /// `[NOT] EXISTS (SELECT ...)`.
    Exists {
        query: Box<SelectStatement>,
        negated: bool,
    },
    /// `*` or `table.*`.
    Wildcard { table: Option<String> },
}

impl Expr {
    /// Creates a column reference expression from `"name"` or `"table.name"`.
    #[must_use]
    pub fn column(reference: &str) -> Self {
        Self::Column(ColumnRef::parse(reference))
    }

    /// Creates a qualified column reference without parsing dots.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::qualified(table, name))
    }

    /// Looks through AND/OR nodes that have a single operand. Such nodes
    /// render exactly like their operand.
    #[must_use]
    pub fn unwrap_single(&self) -> &Self {
        let mut current = self;
        while let Self::Logical {
            op: LogicalOp::And | LogicalOp::Or,
            operands,
        } = current
        {
            match operands.as_slice() {
                [only] => current = only,
                _ => break,
            }
        }
        current
    }

    /// Returns true if this expression evaluates to a boolean.
    #[must_use]
    pub const fn is_predicate(&self) -> bool {
        matches!(
            self,
            Self::Comparison(_) | Self::Logical { .. } | Self::Exists { .. }
        )
    }
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Self::Column(column)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Literal(value)
    }
}

impl From<SelectStatement> for Expr {
    fn from(query: SelectStatement) -> Self {
        Self::Subquery(Box::new(query))
    }
}
