//! Connection-related data models.
//!
//! This module defines the database backend type and the settings every
//! per-call connection is opened with.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default table holding student records.
pub const DEFAULT_TABLE: &str = "students";

/// Supported database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    PostgreSQL,
    /// Includes MariaDB
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Parse database type from a connection string.
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let lower = connection_string.to_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if lower.starts_with("sqlite://") || lower.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "PostgreSQL",
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }

    /// Whether bind parameters are numbered (`$1`, `$2`) rather than positional (`?`).
    pub fn uses_numbered_placeholders(&self) -> bool {
        matches!(self, Self::PostgreSQL)
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Configuration for opening per-call database connections.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub db_type: DatabaseType,
    /// Contains sensitive data - never log
    pub connection_string: String,
    /// Validated SQL identifier of the student table.
    pub table: String,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl ConnectionConfig {
    /// Create a new connection configuration with default table and timeouts.
    pub fn new(connection_string: impl Into<String>) -> Result<Self, ConnectionConfigError> {
        let connection_string = connection_string.into();
        let db_type = DatabaseType::from_connection_string(&connection_string)
            .ok_or_else(|| ConnectionConfigError::UnknownDatabaseType(mask(&connection_string)))?;

        Ok(Self {
            db_type,
            connection_string,
            table: DEFAULT_TABLE.to_string(),
            connect_timeout: Duration::from_secs(10),
            query_timeout: Duration::from_secs(30),
        })
    }

    /// Use a different table name. The name must be a plain SQL identifier.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self, ConnectionConfigError> {
        let table = table.into();
        if !is_valid_identifier(&table) {
            return Err(ConnectionConfigError::InvalidTable(table));
        }
        self.table = table;
        Ok(self)
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, query_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.query_timeout = query_timeout;
        self
    }

    /// Get a display-safe version of the connection string (credentials masked).
    pub fn masked_connection_string(&self) -> String {
        mask(&self.connection_string)
    }
}

fn mask(connection_string: &str) -> String {
    if let Some(at_pos) = connection_string.find('@') {
        if let Some(colon_pos) = connection_string[..at_pos].rfind(':') {
            // A colon right after "scheme:" means there is no password to hide.
            if !connection_string[colon_pos..].starts_with("://") {
                let prefix = &connection_string[..colon_pos + 1];
                let suffix = &connection_string[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
    }
    connection_string.to_string()
}

/// `[A-Za-z_][A-Za-z0-9_]*`, at most 64 characters.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 64 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Errors that can occur when creating a connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionConfigError {
    /// Could not determine database type from connection string
    #[error("Unknown database type in connection string: {0}")]
    UnknownDatabaseType(String),

    /// Table name is not a plain SQL identifier
    #[error("Invalid table name '{0}': use letters, digits and underscores only")]
    InvalidTable(String),
}
