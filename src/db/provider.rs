//! Per-call connection provider.
//!
//! Every operation opens its own connection from the configured URL and closes
//! it when the operation finishes, whatever the outcome. There is no pool and
//! no connection outlives a single call.

use crate::error::{DbError, DbResult};
use crate::models::{ConnectionConfig, DatabaseType};
use sqlx::{
    ConnectOptions, Connection, MySqlConnection, PgConnection, SqliteConnection,
    mysql::MySqlConnectOptions, postgres::PgConnectOptions, sqlite::SqliteConnectOptions,
};
use std::str::FromStr;
use tokio::time::timeout;
use tracing::{debug, warn};

/// An open connection to one of the supported backends.
#[derive(Debug)]
pub enum DbConnection {
    MySql(MySqlConnection),
    Postgres(PgConnection),
    SQLite(SqliteConnection),
}

impl DbConnection {
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbConnection::MySql(_) => DatabaseType::MySQL,
            DbConnection::Postgres(_) => DatabaseType::PostgreSQL,
            DbConnection::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Close the connection. Failures are logged; the connection is gone either way.
    pub async fn close(self) {
        let result = match self {
            DbConnection::MySql(conn) => conn.close().await,
            DbConnection::Postgres(conn) => conn.close().await,
            DbConnection::SQLite(conn) => conn.close().await,
        };
        if let Err(e) = result {
            warn!(error = %e, "Error while closing database connection");
        }
    }
}

/// Opens connections described by a [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: ConnectionConfig,
}

impl ConnectionProvider {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a new connection, bounded by the configured connect timeout.
    pub async fn open(&self) -> DbResult<DbConnection> {
        let connect_timeout = self.config.connect_timeout;
        debug!(
            db_type = %self.config.db_type,
            url = %self.config.masked_connection_string(),
            "Opening database connection"
        );

        let connect = async {
            let conn = match self.config.db_type {
                DatabaseType::MySQL => {
                    let options = MySqlConnectOptions::from_str(&self.config.connection_string)
                        .map_err(|e| invalid_url("MySQL", e))?;
                    DbConnection::MySql(options.connect().await.map_err(connect_error)?)
                }
                DatabaseType::PostgreSQL => {
                    let options = PgConnectOptions::from_str(&self.config.connection_string)
                        .map_err(|e| invalid_url("PostgreSQL", e))?;
                    DbConnection::Postgres(options.connect().await.map_err(connect_error)?)
                }
                DatabaseType::SQLite => {
                    let options = SqliteConnectOptions::from_str(&self.config.connection_string)
                        .map_err(|e| invalid_url("SQLite", e))?;
                    DbConnection::SQLite(options.connect().await.map_err(connect_error)?)
                }
            };
            Ok::<_, DbError>(conn)
        };

        match timeout(connect_timeout, connect).await {
            Ok(result) => result,
            Err(_) => Err(DbError::timeout(
                "database connect",
                connect_timeout.as_secs() as u32,
            )),
        }
    }
}

fn invalid_url(backend: &str, err: sqlx::Error) -> DbError {
    DbError::connection(
        format!("Invalid {} connection string: {}", backend, err),
        "Check the database URL format",
    )
}

/// Errors raised while connecting are connectivity failures regardless of how
/// the driver classifies them.
fn connect_error(err: sqlx::Error) -> DbError {
    match DbError::from(err) {
        DbError::Database { message, .. } | DbError::Internal { message } => DbError::connection(
            message,
            "Check that the database server is reachable and the credentials are valid",
        ),
        other => other,
    }
}
