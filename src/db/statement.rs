//! Parameterized SQL for the student table.
//!
//! Values never appear in SQL text; each one becomes a bind parameter rendered
//! with the backend's placeholder syntax (`?` or `$n`). The table name is the
//! only identifier spliced in, and it is validated when the configuration is
//! built.

use crate::error::{DbError, DbResult};
use crate::models::{DatabaseType, NewStudent, StudentUpdate};

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Identifier column
    BigInt(i64),
    Int(i32),
    Text(String),
}

/// SQL text plus its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

struct StatementBuilder {
    db_type: DatabaseType,
    sql: String,
    params: Vec<SqlParam>,
}

impl StatementBuilder {
    fn new(db_type: DatabaseType) -> Self {
        Self {
            db_type,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn sql(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    fn param(&mut self, value: SqlParam) -> &mut Self {
        self.params.push(value);
        if self.db_type.uses_numbered_placeholders() {
            self.sql.push('$');
            self.sql.push_str(&self.params.len().to_string());
        } else {
            self.sql.push('?');
        }
        self
    }

    fn build(&mut self) -> Statement {
        Statement {
            sql: std::mem::take(&mut self.sql),
            params: std::mem::take(&mut self.params),
        }
    }
}

/// Statement factory for one backend and table.
#[derive(Debug, Clone)]
pub struct StudentStatements {
    db_type: DatabaseType,
    table: String,
}

impl StudentStatements {
    pub fn new(db_type: DatabaseType, table: impl Into<String>) -> Self {
        Self {
            db_type,
            table: table.into(),
        }
    }

    pub fn insert(&self, student: &NewStudent) -> Statement {
        let mut b = StatementBuilder::new(self.db_type);
        b.sql("INSERT INTO ").sql(&self.table);
        match student.id {
            Some(id) => {
                b.sql(" (ID, Name, Age, Grade) VALUES (")
                    .param(SqlParam::BigInt(id))
                    .sql(", ");
            }
            None => {
                b.sql(" (Name, Age, Grade) VALUES (");
            }
        }
        b.param(SqlParam::Text(student.name.clone()))
            .sql(", ")
            .param(SqlParam::Int(student.age))
            .sql(", ")
            .param(SqlParam::Text(student.grade.clone()))
            .sql(")");
        b.build()
    }

    pub fn select_all(&self) -> Statement {
        let mut b = StatementBuilder::new(self.db_type);
        b.sql("SELECT ID, Name, Age, Grade FROM ")
            .sql(&self.table)
            .sql(" ORDER BY ID");
        b.build()
    }

    /// Fails with `InvalidInput` when the update sets no fields.
    pub fn update(&self, id: i64, update: &StudentUpdate) -> DbResult<Statement> {
        if update.is_empty() {
            return Err(DbError::invalid_input(
                "no fields to update; supply at least one of name, age or grade",
            ));
        }

        let mut b = StatementBuilder::new(self.db_type);
        b.sql("UPDATE ").sql(&self.table).sql(" SET ");

        let mut first = true;
        let mut set = |b: &mut StatementBuilder, column: &str, value: SqlParam| {
            if !first {
                b.sql(", ");
            }
            first = false;
            b.sql(column).sql(" = ").param(value);
        };
        if let Some(name) = &update.name {
            set(&mut b, "Name", SqlParam::Text(name.clone()));
        }
        if let Some(age) = update.age {
            set(&mut b, "Age", SqlParam::Int(age));
        }
        if let Some(grade) = &update.grade {
            set(&mut b, "Grade", SqlParam::Text(grade.clone()));
        }

        b.sql(" WHERE ID = ").param(SqlParam::BigInt(id));
        Ok(b.build())
    }

    pub fn delete(&self, id: i64) -> Statement {
        let mut b = StatementBuilder::new(self.db_type);
        b.sql("DELETE FROM ")
            .sql(&self.table)
            .sql(" WHERE ID = ")
            .param(SqlParam::BigInt(id));
        b.build()
    }

    /// `CREATE TABLE IF NOT EXISTS` for local bootstrap.
    pub fn create_table(&self) -> Statement {
        let columns = match self.db_type {
            DatabaseType::SQLite => {
                "ID INTEGER PRIMARY KEY AUTOINCREMENT, Name TEXT NOT NULL, \
                 Age INTEGER NOT NULL, Grade TEXT NOT NULL"
            }
            DatabaseType::MySQL => {
                "ID BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, Name VARCHAR(255) NOT NULL, \
                 Age INT NOT NULL, Grade VARCHAR(32) NOT NULL"
            }
            DatabaseType::PostgreSQL => {
                "ID BIGSERIAL PRIMARY KEY, Name TEXT NOT NULL, \
                 Age INTEGER NOT NULL, Grade TEXT NOT NULL"
            }
        };
        let mut b = StatementBuilder::new(self.db_type);
        b.sql("CREATE TABLE IF NOT EXISTS ")
            .sql(&self.table)
            .sql(" (")
            .sql(columns)
            .sql(")");
        b.build()
    }
}
