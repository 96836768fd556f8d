//! SQL dialect profiles.
//!
//! Databases disagree on identifier quoting, placeholder syntax, pagination
//! and upsert. Everything the renderer needs to know about a target engine
//! goes through the [`Dialect`] trait, so supporting another engine means
//! writing one more `impl Dialect`.

mod embedded;
pub mod keywords;
mod kind;
mod postgres;
mod server;

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::ast::{ConflictAction, OnConflict};
use crate::error::{Error, Result};

pub use embedded::EmbeddedDialect;
pub use kind::DialectKind;
pub use postgres::PostgresDialect;
pub use server::ServerDialect;

/// How a dialect spells INSERT-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStyle {
    /// `ON CONFLICT (target) DO NOTHING | DO UPDATE SET c = excluded.c`.
    OnConflict,
    /// `ON DUPLICATE KEY UPDATE c = VALUES(c)`, or `INSERT IGNORE` for
    /// do-nothing. The conflict target is implied by the table's unique keys.
    OnDuplicateKey,
}

/// The dialect-specific parts of an INSERT carrying an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertClause {
    /// Leading keywords, e.g. `INSERT INTO` or `INSERT IGNORE INTO`.
    pub insert: &'static str,
    /// Clause appended after the VALUES list.
    pub suffix: Option<String>,
}

/// Trait for SQL dialect-specific behavior.
///
/// Profiles are immutable and shared by reference across threads.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the placeholder for the bind parameter at 1-based `index`.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        String::from("?")
    }

    /// Returns the words this dialect refuses as bare identifiers.
    fn reserved_words(&self) -> &'static [&'static str];

    /// Returns true if `name` is reserved, ignoring ASCII case.
    fn is_reserved_word(&self, name: &str) -> bool {
        self.reserved_words()
            .iter()
            .any(|word| word.eq_ignore_ascii_case(name))
    }

    /// Returns true if `name` cannot appear as a bare identifier.
    fn needs_quoting(&self, name: &str) -> bool {
        name.is_empty()
            || name.starts_with(|c: char| c.is_ascii_digit())
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            || self.is_reserved_word(name)
    }

    /// Wraps `name` in quote characters, doubling any embedded quote.
    fn delimit_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for c in name.chars() {
            if c == quote {
                out.push(quote);
            }
            out.push(c);
        }
        out.push(quote);
        out
    }

    /// Returns `name` as it must appear in SQL text: bare when possible,
    /// delimited when reserved or unusual.
    fn quote_identifier(&self, name: &str) -> String {
        if self.needs_quoting(name) {
            tracing::trace!(dialect = self.name(), identifier = name, "quoting identifier");
            self.delimit_identifier(name)
        } else {
            String::from(name)
        }
    }

    /// Returns whether the dialect can skip rows with OFFSET.
    fn supports_offset(&self) -> bool {
        true
    }

    /// Returns whether the dialect has FULL OUTER JOIN.
    fn supports_full_join(&self) -> bool {
        true
    }

    /// Returns the upsert syntax, if the dialect has one.
    fn upsert_style(&self) -> Option<UpsertStyle> {
        None
    }

    /// Renders the pagination clause, or `None` when neither bound is set.
    ///
    /// The default is `LIMIT n OFFSET m`, with `OFFSET m` alone when there
    /// is no limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedConstruct`] for a non-zero offset when
    /// [`Dialect::supports_offset`] is false.
    fn render_pagination(&self, limit: Option<u64>, offset: Option<u64>) -> Result<Option<String>> {
        let offset = match offset {
            Some(o) if !self.supports_offset() => {
                if o > 0 {
                    return Err(Error::unsupported(self, "OFFSET"));
                }
                None
            }
            other => other,
        };
        Ok(match (limit, offset) {
            (None, None) => None,
            (Some(l), None) => Some(format!("LIMIT {l}")),
            (Some(l), Some(o)) => Some(format!("LIMIT {l} OFFSET {o}")),
            (None, Some(o)) => Some(format!("OFFSET {o}")),
        })
    }

    /// Renders the upsert parts of an INSERT according to
    /// [`Dialect::upsert_style`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedConstruct`] when the dialect has no
    /// upsert syntax.
    fn render_upsert(&self, on_conflict: &OnConflict) -> Result<UpsertClause> {
        match self.upsert_style() {
            Some(UpsertStyle::OnConflict) => Ok(on_conflict_clause(self, on_conflict)),
            Some(UpsertStyle::OnDuplicateKey) => Ok(on_duplicate_key_clause(self, on_conflict)),
            None => Err(Error::unsupported(self, "upsert")),
        }
    }

    /// Returns the keyword for a boolean literal.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Returns an escaped string literal.
    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Returns a timestamp literal.
    fn timestamp_literal(&self, value: &NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", value.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Returns a date literal.
    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("DATE '{}'", value.format("%Y-%m-%d"))
    }
}

fn column_list<D: Dialect + ?Sized>(dialect: &D, columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn on_conflict_clause<D: Dialect + ?Sized>(dialect: &D, on_conflict: &OnConflict) -> UpsertClause {
    let mut suffix = String::from("ON CONFLICT");
    if !on_conflict.target.is_empty() {
        suffix.push_str(" (");
        suffix.push_str(&column_list(dialect, &on_conflict.target));
        suffix.push(')');
    }
    match &on_conflict.action {
        ConflictAction::DoNothing => suffix.push_str(" DO NOTHING"),
        ConflictAction::DoUpdate(columns) => {
            suffix.push_str(" DO UPDATE SET ");
            let sets: Vec<String> = columns
                .iter()
                .map(|c| {
                    let c = dialect.quote_identifier(c);
                    format!("{c} = excluded.{c}")
                })
                .collect();
            suffix.push_str(&sets.join(", "));
        }
    }
    UpsertClause {
        insert: "INSERT INTO",
        suffix: Some(suffix),
    }
}

fn on_duplicate_key_clause<D: Dialect + ?Sized>(
    dialect: &D,
    on_conflict: &OnConflict,
) -> UpsertClause {
    match &on_conflict.action {
        ConflictAction::DoNothing => UpsertClause {
            insert: "INSERT IGNORE INTO",
            suffix: None,
        },
        ConflictAction::DoUpdate(columns) => {
            let sets: Vec<String> = columns
                .iter()
                .map(|c| {
                    let c = dialect.quote_identifier(c);
                    format!("{c} = VALUES({c})")
                })
                .collect();
            UpsertClause {
                insert: "INSERT INTO",
                suffix: Some(format!("ON DUPLICATE KEY UPDATE {}", sets.join(", "))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A profile with no reserved words and no optional features.
    #[derive(Debug)]
    struct BareDialect;

    impl Dialect for BareDialect {
        fn name(&self) -> &'static str {
            "bare"
        }

        fn reserved_words(&self) -> &'static [&'static str] {
            &[]
        }

        fn supports_offset(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_default_quoting_rules() {
        let d = BareDialect;
        assert_eq!(d.quote_identifier("order"), "order");
        assert_eq!(d.quote_identifier("first name"), "\"first name\"");
        assert_eq!(d.quote_identifier("2fa"), "\"2fa\"");
        assert_eq!(d.quote_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(d.quote_identifier("user_id"), "user_id");
    }

    #[test]
    fn test_default_pagination() {
        let d = BareDialect;
        assert_eq!(d.render_pagination(None, None).unwrap(), None);
        assert_eq!(
            d.render_pagination(Some(10), None).unwrap().as_deref(),
            Some("LIMIT 10")
        );
        assert_eq!(
            d.render_pagination(Some(10), Some(0)).unwrap().as_deref(),
            Some("LIMIT 10")
        );
        assert!(matches!(
            d.render_pagination(Some(10), Some(5)),
            Err(Error::UnsupportedConstruct { dialect: "bare", .. })
        ));
    }

    #[test]
    fn test_upsert_unsupported_by_default() {
        let on_conflict = OnConflict {
            target: vec![String::from("id")],
            action: ConflictAction::DoNothing,
        };
        let err = BareDialect.render_upsert(&on_conflict).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedConstruct {
                dialect: "bare",
                feature: String::from("upsert"),
            }
        );
    }

    #[test]
    fn test_on_conflict_clause() {
        let on_conflict = OnConflict {
            target: vec![String::from("id")],
            action: ConflictAction::DoUpdate(vec![String::from("name"), String::from("value")]),
        };
        let clause = on_conflict_clause(&EmbeddedDialect::new(), &on_conflict);
        assert_eq!(clause.insert, "INSERT INTO");
        assert_eq!(
            clause.suffix.as_deref(),
            Some("ON CONFLICT (id) DO UPDATE SET name = excluded.name, \"value\" = excluded.\"value\"")
        );
    }

    #[test]
    fn test_on_duplicate_key_clause() {
        let d = ServerDialect::new();
        let ignore = on_duplicate_key_clause(
            &d,
            &OnConflict {
                target: vec![],
                action: ConflictAction::DoNothing,
            },
        );
        assert_eq!(ignore.insert, "INSERT IGNORE INTO");
        assert_eq!(ignore.suffix, None);

        let update = on_duplicate_key_clause(
            &d,
            &OnConflict {
                target: vec![String::from("id")],
                action: ConflictAction::DoUpdate(vec![String::from("rank")]),
            },
        );
        assert_eq!(
            update.suffix.as_deref(),
            Some("ON DUPLICATE KEY UPDATE `rank` = VALUES(`rank`)")
        );
    }
}
