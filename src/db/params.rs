//! Parameter binding utilities for database queries.
//!
//! This module provides functions to bind `SqlParam` values to database-specific
//! query objects.

use crate::db::statement::SqlParam;
use sqlx::mysql::MySqlArguments;
use sqlx::postgres::PgArguments;
use sqlx::sqlite::SqliteArguments;
use sqlx::{MySql, Postgres, Sqlite};

/// Bind a parameter to a MySQL query.
pub(crate) fn bind_mysql_param<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    param: &'q SqlParam,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match param {
        SqlParam::BigInt(v) => query.bind(*v),
        SqlParam::Int(v) => query.bind(*v),
        SqlParam::Text(v) => query.bind(v.as_str()),
    }
}

/// Bind a parameter to a PostgreSQL query.
pub(crate) fn bind_postgres_param<'q>(
    query: sqlx::query::Query<'q, Postgres, PgArguments>,
    param: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match param {
        SqlParam::BigInt(v) => query.bind(*v),
        SqlParam::Int(v) => query.bind(*v),
        SqlParam::Text(v) => query.bind(v.as_str()),
    }
}

/// Bind a parameter to a SQLite query.
pub(crate) fn bind_sqlite_param<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &'q SqlParam,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match param {
        SqlParam::BigInt(v) => query.bind(*v),
        SqlParam::Int(v) => query.bind(*v),
        SqlParam::Text(v) => query.bind(v.as_str()),
    }
}
