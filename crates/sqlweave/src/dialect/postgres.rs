//! PostgreSQL.

use super::{keywords, Dialect, UpsertStyle};

/// PostgreSQL dialect: like the embedded profile but with numbered `$n`
/// placeholders and its own reserved words.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::POSTGRES
    }

    fn upsert_style(&self) -> Option<UpsertStyle> {
        Some(UpsertStyle::OnConflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_dialect() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.name(), "postgres");
        assert_eq!(dialect.placeholder(1), "$1");
        assert_eq!(dialect.placeholder(12), "$12");
        assert_eq!(dialect.quote_identifier("user"), "\"user\"");
        assert_eq!(dialect.quote_identifier("value"), "value");
        assert_eq!(
            dialect.render_pagination(Some(10), Some(20)).unwrap().as_deref(),
            Some("LIMIT 10 OFFSET 20")
        );
        assert_eq!(
            dialect.render_pagination(None, Some(20)).unwrap().as_deref(),
            Some("OFFSET 20")
        );
    }
}
