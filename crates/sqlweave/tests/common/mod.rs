#![allow(dead_code)]

use sqlweave::ast::Statement;
use sqlweave::dialect::{Dialect, EmbeddedDialect, PostgresDialect, ServerDialect};
use sqlweave::{Error, SqlValue};

pub const EMBEDDED: EmbeddedDialect = EmbeddedDialect;
pub const SERVER: ServerDialect = ServerDialect;
pub const POSTGRES: PostgresDialect = PostgresDialect;

pub fn render_with(statement: impl Into<Statement>, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
    let statement = statement.into();
    statement
        .render(dialect)
        .unwrap_or_else(|e| panic!("Failed to render {statement:?}\nError: {e}"))
        .into_parts()
}

pub fn render_err(statement: impl Into<Statement>, dialect: &dyn Dialect) -> Error {
    let statement = statement.into();
    statement
        .render(dialect)
        .expect_err(&format!("Expected render error for: {statement:?}"))
}

/// Renders for the embedded profile.
pub fn sql(statement: impl Into<Statement>) -> (String, Vec<SqlValue>) {
    render_with(statement, &EMBEDDED)
}

/// Counts placeholders in SQL that contains no quoted text.
pub fn count_placeholders(sql: &str, dialect: &dyn Dialect) -> usize {
    if dialect.placeholder(1) == "?" {
        sql.matches('?').count()
    } else {
        (1..)
            .take_while(|n| sql.contains(&dialect.placeholder(*n)))
            .count()
    }
}

pub fn int(n: i64) -> SqlValue {
    SqlValue::Int(n)
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}
