//! Student CRUD tools.
//!
//! These are the operations an agent calls. Every failure is logged and turned
//! into a readable status string here; nothing below this boundary reaches the
//! caller as a structured error. Reads degrade to an empty list.

use crate::db::StudentRepository;
use crate::error::DbResult;
use crate::models::{NewStudent, Student, StudentUpdate};
use std::sync::Arc;
use tracing::{error, info};

pub const CREATED: &str = "Student added successfully";
pub const UPDATED: &str = "Student updated successfully";
pub const DELETED: &str = "Student deleted successfully";

#[derive(Debug, Clone)]
pub struct StudentTools {
    repository: Arc<StudentRepository>,
}

impl StudentTools {
    pub fn new(repository: Arc<StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_student(&self, student: NewStudent) -> String {
        let result = self.repository.create(&student).await;
        report("creating", CREATED, result)
    }

    pub async fn read_students(&self) -> Vec<Student> {
        match self.repository.read_all().await {
            Ok(students) => {
                info!(count = students.len(), "Read students");
                students
            }
            Err(e) => {
                error!(error = %e, "Error reading students");
                Vec::new()
            }
        }
    }

    pub async fn update_student(&self, id: i64, update: StudentUpdate) -> String {
        let result = self.repository.update(id, &update).await;
        report("updating", UPDATED, result)
    }

    pub async fn delete_student(&self, id: i64) -> String {
        let result = self.repository.delete(id).await;
        report("deleting", DELETED, result)
    }
}

fn report(verb: &str, success: &str, result: DbResult<u64>) -> String {
    match result {
        Ok(rows_affected) => {
            info!(rows_affected, "{}", success);
            success.to_string()
        }
        Err(e) => {
            error!(error = %e, retryable = e.is_retryable(), "Error {} student", verb);
            format!("Error {} student: {}", verb, e)
        }
    }
}
