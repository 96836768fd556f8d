//! File-embedded engines (SQLite, H2, DuckDB).

use super::{keywords, Dialect, UpsertStyle};
use crate::error::Result;

/// Dialect for embedded, file-backed engines.
///
/// Double-quoted identifiers, `?` placeholders, `LIMIT n OFFSET m` and
/// `ON CONFLICT` upserts.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedDialect;

impl EmbeddedDialect {
    /// Creates a new embedded dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for EmbeddedDialect {
    fn name(&self) -> &'static str {
        "file-embedded"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::EMBEDDED
    }

    fn upsert_style(&self) -> Option<UpsertStyle> {
        Some(UpsertStyle::OnConflict)
    }

    fn render_pagination(&self, limit: Option<u64>, offset: Option<u64>) -> Result<Option<String>> {
        // SQLite has no bare OFFSET; a negative limit means "no limit".
        Ok(match (limit, offset) {
            (None, None) => None,
            (Some(l), None) => Some(format!("LIMIT {l}")),
            (Some(l), Some(o)) => Some(format!("LIMIT {l} OFFSET {o}")),
            (None, Some(o)) => Some(format!("LIMIT -1 OFFSET {o}")),
        })
    }
}
