//! Statement execution engine.
//!
//! Runs one [`Statement`] on an open [`DbConnection`]:
//! - writes execute inside a transaction that commits on success and rolls
//!   back on failure
//! - reads decode rows into [`Student`] records
//! - every call is bounded by a timeout
//!
//! Each backend has its own submodule; the structure is kept parallel so the
//! differences between them stay obvious.

use crate::db::provider::DbConnection;
use crate::db::statement::Statement;
use crate::error::{DbError, DbResult};
use crate::models::Student;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Executes statements with a fixed timeout.
#[derive(Debug, Clone)]
pub struct StatementExecutor {
    query_timeout: Duration,
}

impl StatementExecutor {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    /// Execute a write statement in its own transaction and return affected rows.
    pub async fn execute_write(&self, conn: &mut DbConnection, stmt: &Statement) -> DbResult<u64> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "Executing write statement");

        let work = async {
            match conn {
                DbConnection::MySql(c) => mysql::execute_write(c, stmt).await,
                DbConnection::Postgres(c) => postgres::execute_write(c, stmt).await,
                DbConnection::SQLite(c) => sqlite::execute_write(c, stmt).await,
            }
        };
        self.bounded("write operation", work).await
    }

    /// Execute a SELECT and decode every row as a student.
    pub async fn fetch_students(
        &self,
        conn: &mut DbConnection,
        stmt: &Statement,
    ) -> DbResult<Vec<Student>> {
        debug!(sql = %stmt.sql, "Executing query");

        let work = async {
            match conn {
                DbConnection::MySql(c) => mysql::fetch_students(c, stmt).await,
                DbConnection::Postgres(c) => postgres::fetch_students(c, stmt).await,
                DbConnection::SQLite(c) => sqlite::fetch_students(c, stmt).await,
            }
        };
        self.bounded("query execution", work).await
    }

    /// Execute a parameterless statement outside a transaction (DDL).
    pub async fn execute_raw(&self, conn: &mut DbConnection, stmt: &Statement) -> DbResult<()> {
        use sqlx::Executor;

        debug!(sql = %stmt.sql, "Executing statement");
        let sql = stmt.sql.as_str();
        let work = async {
            let result = match conn {
                DbConnection::MySql(c) => c.execute(sql).await.map(|_| ()),
                DbConnection::Postgres(c) => c.execute(sql).await.map(|_| ()),
                DbConnection::SQLite(c) => c.execute(sql).await.map(|_| ()),
            };
            result.map_err(DbError::from)
        };
        self.bounded("statement execution", work).await
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        work: impl std::future::Future<Output = DbResult<T>>,
    ) -> DbResult<T> {
        match timeout(self.query_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(DbError::timeout(operation, self.query_timeout.as_secs() as u32)),
        }
    }
}

fn log_rollback(result: Result<(), sqlx::Error>) {
    match result {
        Ok(()) => debug!("Transaction rolled back"),
        Err(e) => warn!(error = %e, "Transaction rollback failed"),
    }
}

fn narrow_age(value: i64) -> DbResult<i32> {
    i32::try_from(value).map_err(|_| DbError::internal(format!("Age {} is out of range", value)))
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

mod mysql {
    use super::*;
    use crate::db::params::bind_mysql_param;
    use sqlx::mysql::MySqlRow;
    use sqlx::{Connection, MySqlConnection, Row};

    pub async fn execute_write(conn: &mut MySqlConnection, stmt: &Statement) -> DbResult<u64> {
        let mut tx = conn.begin().await?;
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = bind_mysql_param(query, param);
        }

        match query.execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                log_rollback(tx.rollback().await);
                Err(DbError::from(e))
            }
        }
    }

    pub async fn fetch_students(
        conn: &mut MySqlConnection,
        stmt: &Statement,
    ) -> DbResult<Vec<Student>> {
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = bind_mysql_param(query, param);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(to_student).collect()
    }

    fn to_student(row: &MySqlRow) -> DbResult<Student> {
        Ok(Student {
            id: int_column(row, 0)?,
            name: row.try_get(1)?,
            age: narrow_age(int_column(row, 2)?)?,
            grade: row.try_get(3)?,
        })
    }

    /// Integer columns may be declared INT, BIGINT or their UNSIGNED variants.
    fn int_column(row: &MySqlRow, index: usize) -> DbResult<i64> {
        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Ok(v);
        }
        if let Ok(v) = row.try_get::<i32, _>(index) {
            return Ok(i64::from(v));
        }
        if let Ok(v) = row.try_get::<u32, _>(index) {
            return Ok(i64::from(v));
        }
        let v: u64 = row.try_get(index)?;
        i64::try_from(v).map_err(|_| {
            DbError::internal(format!("Value {} in column {} is out of range", v, index))
        })
    }
}

mod postgres {
    use super::*;
    use crate::db::params::bind_postgres_param;
    use sqlx::postgres::PgRow;
    use sqlx::{Connection, PgConnection, Row};

    pub async fn execute_write(conn: &mut PgConnection, stmt: &Statement) -> DbResult<u64> {
        let mut tx = conn.begin().await?;
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = bind_postgres_param(query, param);
        }

        match query.execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                log_rollback(tx.rollback().await);
                Err(DbError::from(e))
            }
        }
    }

    pub async fn fetch_students(conn: &mut PgConnection, stmt: &Statement) -> DbResult<Vec<Student>> {
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = bind_postgres_param(query, param);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(to_student).collect()
    }

    fn to_student(row: &PgRow) -> DbResult<Student> {
        Ok(Student {
            id: int_column(row, 0)?,
            name: row.try_get(1)?,
            age: narrow_age(int_column(row, 2)?)?,
            grade: row.try_get(3)?,
        })
    }

    // INT4 and INT8 are distinct types to the Postgres driver.
    fn int_column(row: &PgRow, index: usize) -> DbResult<i64> {
        match row.try_get::<i64, _>(index) {
            Ok(v) => Ok(v),
            Err(_) => Ok(i64::from(row.try_get::<i32, _>(index)?)),
        }
    }
}

mod sqlite {
    use super::*;
    use crate::db::params::bind_sqlite_param;
    use sqlx::sqlite::SqliteRow;
    use sqlx::{Connection, Row, SqliteConnection};

    pub async fn execute_write(conn: &mut SqliteConnection, stmt: &Statement) -> DbResult<u64> {
        let mut tx = conn.begin().await?;
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = bind_sqlite_param(query, param);
        }

        match query.execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                log_rollback(tx.rollback().await);
                Err(DbError::from(e))
            }
        }
    }

    pub async fn fetch_students(
        conn: &mut SqliteConnection,
        stmt: &Statement,
    ) -> DbResult<Vec<Student>> {
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = bind_sqlite_param(query, param);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter().map(to_student).collect()
    }

    fn to_student(row: &SqliteRow) -> DbResult<Student> {
        Ok(Student {
            id: row.try_get::<i64, _>(0)?,
            name: row.try_get(1)?,
            age: narrow_age(row.try_get::<i64, _>(2)?)?,
            grade: row.try_get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::provider::ConnectionProvider;
    use crate::db::statement::StudentStatements;
    use crate::models::{ConnectionConfig, DatabaseType, NewStudent};

    async fn memory_conn() -> DbConnection {
        ConnectionProvider::new(ConnectionConfig::new("sqlite::memory:").unwrap())
            .open()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_write_then_fetch_on_one_connection() {
        let executor = StatementExecutor::new(Duration::from_secs(5));
        let statements = StudentStatements::new(DatabaseType::SQLite, "students");
        let mut conn = memory_conn().await;

        executor
            .execute_raw(&mut conn, &statements.create_table())
            .await
            .unwrap();
        let affected = executor
            .execute_write(&mut conn, &statements.insert(&NewStudent::new("Ada", 19, "B")))
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let students = executor
            .fetch_students(&mut conn, &statements.select_all())
            .await
            .unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Ada");
        assert_eq!(students[0].age, 19);
        conn.close().await;
    }

    #[tokio::test]
    async fn test_failed_write_is_rolled_back() {
        let executor = StatementExecutor::new(Duration::from_secs(5));
        let statements = StudentStatements::new(DatabaseType::SQLite, "students");
        let mut conn = memory_conn().await;
        executor
            .execute_raw(&mut conn, &statements.create_table())
            .await
            .unwrap();

        let first = NewStudent::new("Ada", 19, "B").with_id(1);
        executor
            .execute_write(&mut conn, &statements.insert(&first))
            .await
            .unwrap();

        let duplicate = NewStudent::new("Grace", 22, "A").with_id(1);
        let err = executor
            .execute_write(&mut conn, &statements.insert(&duplicate))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Database { .. }), "got {err:?}");

        let students = executor
            .fetch_students(&mut conn, &statements.select_all())
            .await
            .unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_fetch_from_missing_table_fails() {
        let executor = StatementExecutor::new(Duration::from_secs(5));
        let statements = StudentStatements::new(DatabaseType::SQLite, "students");
        let mut conn = memory_conn().await;
        let result = executor
            .fetch_students(&mut conn, &statements.select_all())
            .await;
        assert!(result.is_err());
    }
}
