//! Student repository.
//!
//! Each method acquires a fresh connection, runs exactly one statement and
//! releases the connection before returning, on the error path as well.

use crate::db::executor::StatementExecutor;
use crate::db::provider::{ConnectionProvider, DbConnection};
use crate::db::statement::{Statement, StudentStatements};
use crate::error::DbResult;
use crate::models::{ConnectionConfig, NewStudent, Student, StudentUpdate};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct StudentRepository {
    provider: ConnectionProvider,
    executor: StatementExecutor,
    statements: StudentStatements,
}

impl StudentRepository {
    pub fn new(config: ConnectionConfig) -> Self {
        let executor = StatementExecutor::new(config.query_timeout);
        let statements = StudentStatements::new(config.db_type, config.table.clone());
        Self {
            provider: ConnectionProvider::new(config),
            executor,
            statements,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.provider.config()
    }

    /// Insert one student. Returns the number of rows written.
    pub async fn create(&self, student: &NewStudent) -> DbResult<u64> {
        self.write(self.statements.insert(student)).await
    }

    /// All students ordered by ID.
    pub async fn read_all(&self) -> DbResult<Vec<Student>> {
        let stmt = self.statements.select_all();
        let mut conn = self.provider.open().await?;
        let result = self.executor.fetch_students(&mut conn, &stmt).await;
        release(conn).await;
        result
    }

    /// Change the supplied fields of one student. Zero matched rows is not an error.
    pub async fn update(&self, id: i64, update: &StudentUpdate) -> DbResult<u64> {
        let stmt = self.statements.update(id, update)?;
        self.write(stmt).await
    }

    /// Remove one student. Zero matched rows is not an error.
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        self.write(self.statements.delete(id)).await
    }

    /// Create the student table if it does not exist.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        let stmt = self.statements.create_table();
        let mut conn = self.provider.open().await?;
        let result = self.executor.execute_raw(&mut conn, &stmt).await;
        release(conn).await;
        result
    }

    async fn write(&self, stmt: Statement) -> DbResult<u64> {
        let mut conn = self.provider.open().await?;
        let result = self.executor.execute_write(&mut conn, &stmt).await;
        release(conn).await;
        if let Ok(rows) = &result {
            debug!(rows_affected = rows, "Write committed");
        }
        result
    }
}

async fn release(conn: DbConnection) {
    let db_type = conn.db_type();
    conn.close().await;
    debug!(%db_type, "Database connection released");
}
