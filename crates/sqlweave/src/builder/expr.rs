//! Expression builders.
//!
//! Free functions create leaves and connectives; comparison methods on
//! [`Expr`] chain from there. Every call returns a new node and leaves its
//! inputs untouched.

use chrono::{NaiveDate, NaiveDateTime};

use super::value::{SqlValue, ToSqlValue};
use crate::ast::{
    BinaryOp, Comparison, Expr, FunctionCall, InList, LogicalOp, Projection, SelectStatement,
};

/// Creates a column reference from `"name"` or `"table.name"`.
#[must_use]
pub fn col(name: &str) -> Expr {
    Expr::column(name)
}

/// Creates a column reference qualified by a table name or alias.
#[must_use]
pub fn table_col(table: &str, name: &str) -> Expr {
    Expr::qualified_column(table, name)
}

/// Creates a literal, rendered as a bind parameter.
#[must_use]
pub fn lit<T: ToSqlValue>(value: T) -> Expr {
    Expr::Literal(value.to_sql_value())
}

/// Creates `*`.
#[must_use]
pub const fn star() -> Expr {
    Expr::Wildcard { table: None }
}

/// AND over all `operands`. A single operand renders bare.
#[must_use]
pub fn and(operands: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Logical {
        op: LogicalOp::And,
        operands: operands.into_iter().collect(),
    }
}

/// OR over all `operands`. A single operand renders bare.
#[must_use]
pub fn or(operands: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Logical {
        op: LogicalOp::Or,
        operands: operands.into_iter().collect(),
    }
}

/// Negates a predicate.
#[must_use]
pub fn not(operand: Expr) -> Expr {
    Expr::Logical {
        op: LogicalOp::Not,
        operands: vec![operand],
    }
}

/// `EXISTS (query)`.
#[must_use]
pub fn exists(query: SelectStatement) -> Expr {
    Expr::Exists {
        query: Box::new(query),
        negated: false,
    }
}

/// `NOT EXISTS (query)`.
#[must_use]
pub fn not_exists(query: SelectStatement) -> Expr {
    Expr::Exists {
        query: Box::new(query),
        negated: true,
    }
}

/// Calls a function by name.
#[must_use]
pub fn func(name: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Function(FunctionCall {
        name: String::from(name),
        args: args.into_iter().collect(),
        distinct: false,
    })
}

/// `COUNT(*)`.
#[must_use]
pub fn count_all() -> Expr {
    func("COUNT", [star()])
}

/// `COUNT(expr)`.
#[must_use]
pub fn count(expr: Expr) -> Expr {
    func("COUNT", [expr])
}

/// `COUNT(DISTINCT expr)`.
#[must_use]
pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Function(FunctionCall {
        name: String::from("COUNT"),
        args: vec![expr],
        distinct: true,
    })
}

/// `SUM(expr)`.
#[must_use]
pub fn sum(expr: Expr) -> Expr {
    func("SUM", [expr])
}

/// `AVG(expr)`.
#[must_use]
pub fn avg(expr: Expr) -> Expr {
    func("AVG", [expr])
}

/// `MIN(expr)`.
#[must_use]
pub fn min(expr: Expr) -> Expr {
    func("MIN", [expr])
}

/// `MAX(expr)`.
#[must_use]
pub fn max(expr: Expr) -> Expr {
    func("MAX", [expr])
}

impl Expr {
    fn binary(self, op: BinaryOp, rhs: Self) -> Self {
        Self::Comparison(Comparison::Binary {
            left: Box::new(self),
            op,
            right: Box::new(rhs),
        })
    }

    /// `self = rhs`. Comparing with a NULL literal yields `IS NULL`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn eq(self, rhs: impl Into<Self>) -> Self {
        match rhs.into() {
            Self::Literal(SqlValue::Null) => self.is_null(),
            rhs => self.binary(BinaryOp::Eq, rhs),
        }
    }

    /// `self <> rhs`. Comparing with a NULL literal yields `IS NOT NULL`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn ne(self, rhs: impl Into<Self>) -> Self {
        match rhs.into() {
            Self::Literal(SqlValue::Null) => self.is_not_null(),
            rhs => self.binary(BinaryOp::NotEq, rhs),
        }
    }

    /// `self < rhs`.
    #[must_use]
    pub fn lt(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Lt, rhs.into())
    }

    /// `self <= rhs`.
    #[must_use]
    pub fn lt_eq(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::LtEq, rhs.into())
    }

    /// `self > rhs`.
    #[must_use]
    pub fn gt(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Gt, rhs.into())
    }

    /// `self >= rhs`.
    #[must_use]
    pub fn gt_eq(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::GtEq, rhs.into())
    }

    /// `self LIKE pattern`; the pattern is passed through unchanged.
    #[must_use]
    pub fn like(self, pattern: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Like, pattern.into())
    }

    /// `self NOT LIKE pattern`.
    #[must_use]
    pub fn not_like(self, pattern: impl Into<Self>) -> Self {
        self.binary(BinaryOp::NotLike, pattern.into())
    }

    /// Matches values containing `value`, bound as `%value%`.
    ///
    /// `%` and `_` inside `value` keep their wildcard meaning.
    #[must_use]
    pub fn contains(self, value: &str) -> Self {
        self.like(format!("%{value}%"))
    }

    /// Matches values starting with `value`, bound as `value%`.
    #[must_use]
    pub fn starts_with(self, value: &str) -> Self {
        self.like(format!("{value}%"))
    }

    /// Matches values ending with `value`, bound as `%value`.
    #[must_use]
    pub fn ends_with(self, value: &str) -> Self {
        self.like(format!("%{value}"))
    }

    /// `self IS NULL`.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::Comparison(Comparison::IsNull {
            expr: Box::new(self),
            negated: false,
        })
    }

    /// `self IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::Comparison(Comparison::IsNull {
            expr: Box::new(self),
            negated: true,
        })
    }

    /// `self BETWEEN low AND high`.
    #[must_use]
    pub fn between(self, low: impl Into<Self>, high: impl Into<Self>) -> Self {
        Self::Comparison(Comparison::Between {
            expr: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        })
    }

    /// `self NOT BETWEEN low AND high`.
    #[must_use]
    pub fn not_between(self, low: impl Into<Self>, high: impl Into<Self>) -> Self {
        Self::Comparison(Comparison::Between {
            expr: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: true,
        })
    }

    /// `self IN (values...)`. An empty list is rejected at build time.
    #[must_use]
    pub fn in_list<T: Into<Self>>(self, values: impl IntoIterator<Item = T>) -> Self {
        Self::Comparison(Comparison::In {
            expr: Box::new(self),
            list: InList::Values(values.into_iter().map(Into::into).collect()),
            negated: false,
        })
    }

    /// `self NOT IN (values...)`.
    #[must_use]
    pub fn not_in_list<T: Into<Self>>(self, values: impl IntoIterator<Item = T>) -> Self {
        Self::Comparison(Comparison::In {
            expr: Box::new(self),
            list: InList::Values(values.into_iter().map(Into::into).collect()),
            negated: true,
        })
    }

    /// `self IN (SELECT ...)`.
    #[must_use]
    pub fn in_subquery(self, query: SelectStatement) -> Self {
        Self::Comparison(Comparison::In {
            expr: Box::new(self),
            list: InList::Subquery(Box::new(query)),
            negated: false,
        })
    }

    /// `self NOT IN (SELECT ...)`.
    #[must_use]
    pub fn not_in_subquery(self, query: SelectStatement) -> Self {
        Self::Comparison(Comparison::In {
            expr: Box::new(self),
            list: InList::Subquery(Box::new(query)),
            negated: true,
        })
    }

    /// `self AND other`. Chained calls extend one AND node.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::Logical {
                op: LogicalOp::And,
                mut operands,
            } => {
                operands.push(other);
                Self::Logical {
                    op: LogicalOp::And,
                    operands,
                }
            }
            this => and([this, other]),
        }
    }

    /// `self OR other`. Chained calls extend one OR node.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Logical {
                op: LogicalOp::Or,
                mut operands,
            } => {
                operands.push(other);
                Self::Logical {
                    op: LogicalOp::Or,
                    operands,
                }
            }
            this => or([this, other]),
        }
    }

    /// `NOT self`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        not(self)
    }

    /// Turns this expression into an aliased projection.
    #[must_use]
    pub fn alias(self, alias: &str) -> Projection {
        Projection::new(self).alias(alias)
    }
}

macro_rules! expr_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Self::Literal(value.to_sql_value())
                }
            }
        )*
    };
}

expr_from_value!(
    bool,
    i64,
    i32,
    i16,
    i8,
    u32,
    u16,
    u8,
    f64,
    f32,
    String,
    &str,
    &String,
    Vec<u8>,
    &[u8],
    NaiveDateTime,
    NaiveDate
);

impl<T: ToSqlValue> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        Self::Literal(value.to_sql_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnRef;

    #[test]
    fn test_col_parses_qualifier() {
        assert_eq!(col("u.id"), Expr::Column(ColumnRef::qualified("u", "id")));
        assert_eq!(table_col("u", "id"), col("u.id"));
    }

    #[test]
    fn test_eq_null_becomes_is_null() {
        assert_eq!(col("deleted_at").eq(None::<i64>), col("deleted_at").is_null());
        assert_eq!(
            col("deleted_at").ne(SqlValue::Null),
            col("deleted_at").is_not_null()
        );
    }

    #[test]
    fn test_column_to_column_comparison() {
        let on = col("o.user_id").eq(col("u.id"));
        match on {
            Expr::Comparison(Comparison::Binary { right, .. }) => {
                assert_eq!(*right, Expr::Column(ColumnRef::qualified("u", "id")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_like_helpers() {
        assert_eq!(col("name").contains("test"), col("name").like("%test%"));
        assert_eq!(col("name").starts_with("ab"), col("name").like("ab%"));
        assert_eq!(col("name").ends_with("ab"), col("name").like("%ab"));
    }

    #[test]
    fn test_and_chain_flattens() {
        let a = col("a").eq(1);
        let b = col("b").eq(2);
        let c = col("c").eq(3);
        assert_eq!(
            a.clone().and(b.clone()).and(c.clone()),
            and([a.clone(), b.clone(), c.clone()])
        );
        // A different connective starts a new node.
        assert_eq!(
            a.clone().or(b.clone()).and(c.clone()),
            and([or([a, b]), c])
        );
    }

    #[test]
    fn test_combinators_do_not_mutate_inputs() {
        let shared = col("active").eq(true);
        let first = shared.clone().and(col("a").eq(1));
        let second = shared.clone().or(col("b").eq(2));
        assert_eq!(shared, col("active").eq(true));
        assert_ne!(first, second);
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(
            count_all(),
            Expr::Function(FunctionCall {
                name: String::from("COUNT"),
                args: vec![star()],
                distinct: false,
            })
        );
        match count_distinct(col("user_id")) {
            Expr::Function(call) => {
                assert!(call.distinct);
                assert_eq!(call.name, "COUNT");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_alias() {
        let projection = sum(col("total")).alias("revenue");
        assert_eq!(projection.alias.as_deref(), Some("revenue"));
    }
}
