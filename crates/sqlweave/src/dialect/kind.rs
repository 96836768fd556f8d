//! Profile selection by name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Dialect, EmbeddedDialect, PostgresDialect, ServerDialect};
use crate::error::Error;

/// Names one of the built-in dialect profiles.
///
/// This is the only configuration the crate has. It parses from the
/// profile name or a common engine name, and deserializes the same way so
/// an application can keep it in its own config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialectKind {
    /// SQLite, H2, DuckDB.
    #[default]
    #[serde(alias = "sqlite", alias = "h2", alias = "duckdb")]
    FileEmbedded,
    /// MySQL, MariaDB.
    #[serde(alias = "mysql", alias = "mariadb")]
    NetworkedServer,
    /// PostgreSQL.
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DialectKind {
    /// Every built-in profile.
    pub const ALL: [Self; 3] = [Self::FileEmbedded, Self::NetworkedServer, Self::Postgres];

    /// Returns the profile implementation.
    #[must_use]
    pub fn profile(self) -> &'static dyn Dialect {
        match self {
            Self::FileEmbedded => &EmbeddedDialect,
            Self::NetworkedServer => &ServerDialect,
            Self::Postgres => &PostgresDialect,
        }
    }

    /// Returns the canonical profile name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileEmbedded => "file-embedded",
            Self::NetworkedServer => "networked-server",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file-embedded" | "sqlite" | "h2" | "duckdb" => Ok(Self::FileEmbedded),
            "networked-server" | "mysql" | "mariadb" => Ok(Self::NetworkedServer),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(Error::UnknownDialect(String::from(s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("file-embedded".parse::<DialectKind>().unwrap(), DialectKind::FileEmbedded);
        assert_eq!("SQLite".parse::<DialectKind>().unwrap(), DialectKind::FileEmbedded);
        assert_eq!("mariadb".parse::<DialectKind>().unwrap(), DialectKind::NetworkedServer);
        assert_eq!(" postgresql ".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!(
            "oracle".parse::<DialectKind>().unwrap_err(),
            Error::UnknownDialect(String::from("oracle"))
        );
    }

    #[test]
    fn test_profile_names_match() {
        for kind in DialectKind::ALL {
            assert_eq!(kind.profile().name(), kind.as_str());
            assert_eq!(kind.to_string().parse::<DialectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize)]
        struct Config {
            dialect: DialectKind,
        }

        let config: Config = serde_json::from_str(r#"{"dialect":"networked-server"}"#).unwrap();
        assert_eq!(config.dialect, DialectKind::NetworkedServer);

        let config: Config = serde_json::from_str(r#"{"dialect":"mysql"}"#).unwrap();
        assert_eq!(config.dialect, DialectKind::NetworkedServer);

        assert!(serde_json::from_str::<Config>(r#"{"dialect":"oracle"}"#).is_err());
        assert_eq!(
            serde_json::to_string(&DialectKind::FileEmbedded).unwrap(),
            r#""file-embedded""#
        );
    }
}
