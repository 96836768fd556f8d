//! Networked database servers (MySQL, MariaDB).

use super::{keywords, Dialect, UpsertStyle};
use crate::error::Result;

/// Dialect for MySQL-family servers.
///
/// Backtick-quoted identifiers, `?` placeholders, `LIMIT offset, count`,
/// `ON DUPLICATE KEY UPDATE` upserts and no FULL OUTER JOIN.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerDialect;

impl ServerDialect {
    /// Creates a new server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for ServerDialect {
    fn name(&self) -> &'static str {
        "networked-server"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::SERVER
    }

    fn supports_full_join(&self) -> bool {
        false
    }

    fn upsert_style(&self) -> Option<UpsertStyle> {
        Some(UpsertStyle::OnDuplicateKey)
    }

    fn render_pagination(&self, limit: Option<u64>, offset: Option<u64>) -> Result<Option<String>> {
        // An offset needs a row count; the server documents 2^64-1 for "all".
        Ok(match (limit, offset) {
            (None, None) => None,
            (Some(l), None) => Some(format!("LIMIT {l}")),
            (Some(l), Some(o)) => Some(format!("LIMIT {o}, {l}")),
            (None, Some(o)) => Some(format!("LIMIT {o}, {}", u64::MAX)),
        })
    }

    fn string_literal(&self, value: &str) -> String {
        let escaped = value.replace('\\', "\\\\").replace('\'', "''");
        format!("'{escaped}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_dialect() {
        let dialect = ServerDialect::new();
        assert_eq!(dialect.name(), "networked-server");
        assert_eq!(dialect.identifier_quote(), '`');
        assert_eq!(dialect.placeholder(3), "?");
        assert!(!dialect.supports_full_join());
        assert_eq!(dialect.upsert_style(), Some(UpsertStyle::OnDuplicateKey));
    }

    #[test]
    fn test_server_quoting() {
        let dialect = ServerDialect::new();
        assert_eq!(dialect.quote_identifier("rank"), "`rank`");
        assert_eq!(dialect.quote_identifier("DIV"), "`DIV`");
        assert_eq!(dialect.quote_identifier("value"), "value");
        assert_eq!(dialect.quote_identifier("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_server_pagination() {
        let dialect = ServerDialect::new();
        assert_eq!(
            dialect.render_pagination(Some(10), Some(20)).unwrap().as_deref(),
            Some("LIMIT 20, 10")
        );
        assert_eq!(
            dialect.render_pagination(Some(10), None).unwrap().as_deref(),
            Some("LIMIT 10")
        );
        assert_eq!(
            dialect.render_pagination(None, Some(5)).unwrap().as_deref(),
            Some("LIMIT 5, 18446744073709551615")
        );
    }
}
