//! Statement and expression trees.

mod expression;
mod statement;
mod validate;

pub use expression::{BinaryOp, ColumnRef, Comparison, Expr, FunctionCall, InList, LogicalOp};
pub use statement::{
    Assignment, CompoundMember, ConflictAction, DeleteStatement, InsertStatement, Join, JoinType,
    OnConflict, OrderBy, OrderDirection, Projection, SelectStatement, SetOperator, Statement,
    TableRef, UpdateStatement,
};
