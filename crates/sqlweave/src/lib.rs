//! # sqlweave
//!
//! Composable SQL statements with dialect-aware, parameterized rendering.
//!
//! This crate provides:
//! - An immutable statement and expression model (SELECT, INSERT, UPDATE, DELETE)
//! - Builders that assemble the model, using the typestate pattern where a
//!   missing clause can be caught at compile time
//! - A renderer that turns a statement into SQL text plus ordered bind
//!   parameters for a given [`Dialect`]
//!
//! The crate does not execute anything: hand the rendered SQL and parameters
//! to your own database client.
//!
//! ## Building and rendering
//!
//! ```rust
//! use sqlweave::builder::{col, select};
//! use sqlweave::dialect::{EmbeddedDialect, ServerDialect};
//!
//! let query = select(["id", "name"])
//!     .from("users")
//!     .where_clause(col("active").eq(true))
//!     .order_by(&["name"])
//!     .limit(10)
//!     .offset(20)
//!     .build()
//!     .unwrap();
//!
//! let embedded = query.render(&EmbeddedDialect::new()).unwrap();
//! assert_eq!(
//!     embedded.sql(),
//!     "SELECT id, name FROM users WHERE active = ? ORDER BY name LIMIT 10 OFFSET 20"
//! );
//!
//! let server = query.render(&ServerDialect::new()).unwrap();
//! assert_eq!(
//!     server.sql(),
//!     "SELECT id, name FROM users WHERE active = ? ORDER BY name LIMIT 20, 10"
//! );
//! assert_eq!(embedded.params(), server.params());
//!
//! // This would NOT compile:
//! // let query = select(["id"]).where_clause(col("id").eq(1));  // no FROM
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values never reach the SQL text; they are always bound:
//!
//! ```rust
//! use sqlweave::builder::{col, select, SqlValue};
//! use sqlweave::dialect::EmbeddedDialect;
//!
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, params) = select(["id"])
//!     .from("users")
//!     .where_clause(col("name").eq(user_input))
//!     .build()
//!     .unwrap()
//!     .render(&EmbeddedDialect::new())
//!     .unwrap()
//!     .into_parts();
//!
//! assert_eq!(sql, "SELECT id FROM users WHERE name = ?");
//! assert_eq!(params, vec![SqlValue::Text(String::from(user_input))]);
//! ```

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod error;
pub mod render;

pub use ast::{Expr, SelectStatement, Statement};
pub use builder::{
    col, delete_from, insert_into, select, update, Delete, Insert, Select, SqlValue, ToSqlValue,
    Update,
};
pub use dialect::{Dialect, DialectKind};
pub use error::{Error, Result};
pub use render::{render, RenderedSql};
