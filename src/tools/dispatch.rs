//! Action dispatcher.
//!
//! Maps an action keyword to exactly one CRUD tool, packages the fields that
//! tool needs and returns its textual result. Failures come back as strings.

use crate::error::{DbError, DbResult};
use crate::models::{Action, ActionRequest, NewStudent, StudentUpdate};
use crate::tools::format::{OutputFormat, format_students};
use crate::tools::student::StudentTools;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    tools: StudentTools,
}

impl ActionDispatcher {
    pub fn new(tools: StudentTools) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &StudentTools {
        &self.tools
    }

    /// Run the requested action. Read results are rendered in `format`.
    pub async fn perform_action(&self, request: ActionRequest, format: OutputFormat) -> String {
        let keyword = request.action.clone();
        match self.dispatch(request, format).await {
            Ok(output) => output,
            Err(e) => {
                error!(action = %keyword, error = %e, "Error performing action");
                format!("Error performing action: {}", e)
            }
        }
    }

    async fn dispatch(&self, request: ActionRequest, format: OutputFormat) -> DbResult<String> {
        let action: Action = request.action.parse()?;
        info!(%action, write = action.is_write(), id = ?request.id, "Performing action");

        let output = match action {
            Action::Create => {
                let student = NewStudent::try_from_optional(
                    request.id,
                    request.name,
                    request.age,
                    request.grade,
                )?;
                self.tools.create_student(student).await
            }
            Action::Read => format_students(&self.tools.read_students().await, format),
            Action::Update => {
                let id = require(request.id, "id", action)?;
                let update = StudentUpdate::from_optional(request.name, request.age, request.grade);
                self.tools.update_student(id, update).await
            }
            Action::Delete => {
                let id = require(request.id, "id", action)?;
                self.tools.delete_student(id).await
            }
        };
        Ok(output)
    }
}

fn require<T>(value: Option<T>, field: &str, action: Action) -> DbResult<T> {
    value.ok_or_else(|| DbError::invalid_input(format!("'{}' is required for {}", field, action)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StudentRepository;
    use crate::models::ConnectionConfig;
    use std::sync::Arc;

    /// Dispatcher whose database cannot be opened; only input handling is exercised.
    fn offline_dispatcher() -> ActionDispatcher {
        let config = ConnectionConfig::new("sqlite:/nonexistent/dir/school.db").unwrap();
        ActionDispatcher::new(StudentTools::new(Arc::new(StudentRepository::new(config))))
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let out = offline_dispatcher()
            .perform_action(ActionRequest::new("promote"), OutputFormat::Json)
            .await;
        assert_eq!(
            out,
            "Error performing action: Unknown action 'promote'. Expected one of: create, read, update, delete"
        );
    }

    #[tokio::test]
    async fn test_create_requires_all_fields() {
        let out = offline_dispatcher()
            .perform_action(ActionRequest::new("create").name("John Doe").age(20), OutputFormat::Json)
            .await;
        assert_eq!(
            out,
            "Error performing action: Invalid input: 'grade' is required for create"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let req = ActionRequest::new("create").name("   ").age(20).grade("A");
        let out = offline_dispatcher().perform_action(req, OutputFormat::Json).await;
        assert!(out.contains("'name' is required"));
    }

    #[tokio::test]
    async fn test_update_and_delete_require_id() {
        let dispatcher = offline_dispatcher();
        let out = dispatcher
            .perform_action(ActionRequest::new("update").name("x"), OutputFormat::Json)
            .await;
        assert!(out.contains("'id' is required for update"));
        let out = dispatcher
            .perform_action(ActionRequest::new("delete"), OutputFormat::Json)
            .await;
        assert!(out.contains("'id' is required for delete"));
    }

    #[tokio::test]
    async fn test_read_on_broken_connection_is_empty() {
        let out = offline_dispatcher()
            .perform_action(ActionRequest::new("read"), OutputFormat::Json)
            .await;
        assert_eq!(out, "[]");
    }

    #[tokio::test]
    async fn test_write_on_broken_connection_reports_error() {
        let out = offline_dispatcher()
            .perform_action(ActionRequest::new("delete").id(1), OutputFormat::Json)
            .await;
        assert!(out.starts_with("Error deleting student: Connection failed"), "got {out}");
    }
}
