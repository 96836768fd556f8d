//! Error types for statement building and rendering.

use crate::dialect::Dialect;

/// Errors that can occur while building or rendering a statement.
///
/// None of these are transient: the same inputs always produce the same
/// error, so the fix is to change the call, not to retry it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The statement is structurally invalid (no projections, arity
    /// mismatch, missing assignments, empty table name, ...).
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// A qualified column names a table or alias that is not in scope.
    #[error("unresolved column '{qualifier}.{column}': no table or alias named '{qualifier}' in scope")]
    UnresolvedColumn {
        /// The table or alias qualifier that failed to resolve.
        qualifier: String,
        /// The column name.
        column: String,
    },

    /// The selected dialect cannot express a requested construct.
    #[error("the {dialect} dialect does not support {feature}")]
    UnsupportedConstruct {
        /// Name of the dialect profile.
        dialect: &'static str,
        /// The construct that cannot be rendered.
        feature: String,
    },

    /// A dialect name did not match any known profile.
    #[error("unknown dialect '{0}'")]
    UnknownDialect(String),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedStatement(message.into())
    }

    pub(crate) fn unsupported(dialect: &(impl Dialect + ?Sized), feature: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            dialect: dialect.name(),
            feature: feature.into(),
        }
    }
}

/// Result type for building and rendering.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ServerDialect;

    #[test]
    fn test_error_messages() {
        let err = Error::malformed("UPDATE requires at least one assignment");
        assert_eq!(
            err.to_string(),
            "malformed statement: UPDATE requires at least one assignment"
        );

        let err = Error::UnresolvedColumn {
            qualifier: String::from("x"),
            column: String::from("id"),
        };
        assert_eq!(
            err.to_string(),
            "unresolved column 'x.id': no table or alias named 'x' in scope"
        );

        let err = Error::unsupported(&ServerDialect::new(), "FULL JOIN");
        assert_eq!(
            err.to_string(),
            "the networked-server dialect does not support FULL JOIN"
        );
    }
}
