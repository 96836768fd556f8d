//! Statement builders.
//!
//! Builders assemble the statement model one clause at a time and check it
//! in `build()`. A SELECT without a FROM clause does not compile; the other
//! structural rules (at least one projection, matching row arity, ...) are
//! checked at runtime.
//!
//! # Example
//!
//! ```rust
//! use sqlweave::builder::{col, select};
//! use sqlweave::dialect::EmbeddedDialect;
//!
//! let query = select(["id", "name"])
//!     .from("users")
//!     .where_clause(col("active").eq(true))
//!     .build()
//!     .unwrap();
//!
//! let (sql, params) = query.render(&EmbeddedDialect::new()).unwrap().into_parts();
//! assert_eq!(sql, "SELECT id, name FROM users WHERE active = ?");
//! assert_eq!(params.len(), 1);
//! ```

mod delete;
mod expr;
mod insert;
mod select;
mod update;
pub mod value;

use crate::ast::{Expr, TableRef};

pub use delete::{delete_from, Delete};
pub use expr::{
    and, avg, col, count, count_all, count_distinct, exists, func, lit, max, min, not, not_exists,
    or, star, sum, table_col,
};
pub use insert::{insert_into, HasValues, Insert, NoValues};
pub use select::{select, HasFrom, NoFrom, Select};
pub use update::{update, Update};
pub use value::{SqlValue, ToSqlValue};

/// Creates a table reference; chain `.alias(..)` to name it.
#[must_use]
pub fn table(name: &str) -> TableRef {
    TableRef::table(name)
}

fn combine_and(current: Option<Expr>, expr: Expr) -> Expr {
    match current {
        Some(current) => current.and(expr),
        None => expr,
    }
}
