//! MCP service implementation using rmcp.
//!
//! This module defines the StudentService struct with the student tools
//! exposed via the MCP protocol using the rmcp framework's macros.

use crate::models::{ActionRequest, NewStudent, Student, StudentUpdate};
use crate::tools::{ActionDispatcher, OutputFormat};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for the create_student tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateStudentInput {
    /// Explicit student ID. Omit to let the database assign one.
    #[serde(default)]
    pub id: Option<i64>,
    /// Student name
    pub name: String,
    /// Student age in years
    pub age: i32,
    /// Student grade, e.g. "A"
    pub grade: String,
}

/// Input for the update_student tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateStudentInput {
    /// ID of the student to update
    pub id: i64,
    /// New name. Omit to keep the current value.
    #[serde(default)]
    pub name: Option<String>,
    /// New age. Omit to keep the current value.
    #[serde(default)]
    pub age: Option<i32>,
    /// New grade. Omit to keep the current value.
    #[serde(default)]
    pub grade: Option<String>,
}

/// Input for the delete_student tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteStudentInput {
    /// ID of the student to delete
    pub id: i64,
}

/// Input for the perform_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PerformActionInput {
    /// Action keyword: "create", "read", "update" or "delete"
    pub action: String,
    /// Student ID. Required for update and delete.
    #[serde(default)]
    pub id: Option<i64>,
    /// Student name. Required for create.
    #[serde(default)]
    pub name: Option<String>,
    /// Student age. Required for create.
    #[serde(default)]
    pub age: Option<i32>,
    /// Student grade. Required for create.
    #[serde(default)]
    pub grade: Option<String>,
    /// Output format for read: "json" (default), "table" or "markdown"
    #[serde(default)]
    pub format: OutputFormat,
}

impl PerformActionInput {
    fn into_parts(self) -> (ActionRequest, OutputFormat) {
        let request = ActionRequest {
            action: self.action,
            id: self.id,
            name: self.name,
            age: self.age,
            grade: self.grade,
        };
        (request, self.format)
    }
}

/// Output for the read_students tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ReadStudentsOutput {
    /// All student records ordered by ID. Empty if the table could not be read.
    pub students: Vec<Student>,
    /// Number of students
    pub count: usize,
}

#[derive(Clone)]
pub struct StudentService {
    dispatcher: ActionDispatcher,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl StudentService {
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        Self {
            dispatcher,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl StudentService {
    #[tool(
        description = "Create a new student record.\nName and grade must not be blank.\nReturns \"Student added successfully\" or an error message."
    )]
    async fn create_student(
        &self,
        Parameters(input): Parameters<CreateStudentInput>,
    ) -> Result<String, McpError> {
        let student = NewStudent::try_from_optional(
            input.id,
            Some(input.name),
            Some(input.age),
            Some(input.grade),
        )?;
        Ok(self.dispatcher.tools().create_student(student).await)
    }

    #[tool(description = "Retrieve all student records, ordered by ID.")]
    async fn read_students(&self) -> Json<ReadStudentsOutput> {
        let students = self.dispatcher.tools().read_students().await;
        let count = students.len();
        Json(ReadStudentsOutput { students, count })
    }

    #[tool(
        description = "Update an existing student record.\nOnly the supplied fields change; at least one of name, age or grade is required."
    )]
    async fn update_student(&self, Parameters(input): Parameters<UpdateStudentInput>) -> String {
        let update = StudentUpdate::from_optional(input.name, input.age, input.grade);
        self.dispatcher
            .tools()
            .update_student(input.id, update)
            .await
    }

    #[tool(
        description = "Delete a student record by ID.\nDeleting an ID that does not exist still succeeds."
    )]
    async fn delete_student(&self, Parameters(input): Parameters<DeleteStudentInput>) -> String {
        self.dispatcher.tools().delete_student(input.id).await
    }

    #[tool(
        description = "Perform a student action chosen by keyword (create, read, update, delete) with optional fields.\nReturns the raw textual result of the selected tool."
    )]
    async fn perform_action(&self, Parameters(input): Parameters<PerformActionInput>) -> String {
        let (request, format) = input.into_parts();
        self.dispatcher.perform_action(request, format).await
    }
}

#[tool_handler]
impl ServerHandler for StudentService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "student-mcp-server".to_owned(),
                title: Some("Student Records MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Student manager tools for a single students table (ID, Name, Age, Grade).\n\
                \n\
                ## Workflow\n\
                1. Work out which action the user wants: create, read, update or delete\n\
                2. Call the matching tool with only the data the user gave you\n\
                3. Report the tool's message back unchanged\n\
                \n\
                ## Tools\n\
                - `create_student`: name, age and grade are required\n\
                - `read_students`: returns every record\n\
                - `update_student`: id plus the fields to change\n\
                - `delete_student`: id only\n\
                - `perform_action`: same operations selected by an `action` keyword"
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StudentRepository;
    use crate::models::ConnectionConfig;
    use crate::tools::StudentTools;
    use crate::tools::student::{CREATED, DELETED, UPDATED};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn create_test_service() -> StudentService {
        let config = ConnectionConfig::new("sqlite::memory:").unwrap();
        let tools = StudentTools::new(Arc::new(StudentRepository::new(config)));
        StudentService::new(ActionDispatcher::new(tools))
    }

    async fn service_with_table(file: &NamedTempFile) -> StudentService {
        let url = format!("sqlite:{}", file.path().display());
        let repository = Arc::new(StudentRepository::new(ConnectionConfig::new(url).unwrap()));
        repository.ensure_schema().await.unwrap();
        StudentService::new(ActionDispatcher::new(StudentTools::new(repository)))
    }

    fn create_input(name: &str, age: i32, grade: &str) -> Parameters<CreateStudentInput> {
        Parameters(CreateStudentInput {
            id: None,
            name: name.to_string(),
            age,
            grade: grade.to_string(),
        })
    }

    #[test]
    fn test_server_info() {
        let service = create_test_service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "student-mcp-server");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_all_tools_registered() {
        let service = create_test_service();
        let names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        for expected in [
            "create_student",
            "read_students",
            "update_student",
            "delete_student",
            "perform_action",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
    }

    #[test]
    fn test_perform_action_input_defaults_to_json() {
        let input: PerformActionInput = serde_json::from_str(r#"{"action": "read"}"#).unwrap();
        let (request, format) = input.into_parts();
        assert_eq!(request, ActionRequest::new("read"));
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_perform_action_input_with_format() {
        let json = r#"{"action": "read", "format": "markdown"}"#;
        let input: PerformActionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_create_student_input_requires_fields() {
        let result: Result<CreateStudentInput, _> =
            serde_json::from_str(r#"{"name": "John Doe", "age": 20}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tool_calls_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let service = service_with_table(&file).await;

        let created = service.create_student(create_input("John Doe", 20, "A")).await;
        assert_eq!(created.unwrap(), CREATED);

        let Json(listing) = service.read_students().await;
        assert_eq!(listing.count, 1);
        let id = listing.students[0].id;

        let updated = service
            .update_student(Parameters(UpdateStudentInput {
                id,
                name: None,
                age: Some(21),
                grade: None,
            }))
            .await;
        assert_eq!(updated, UPDATED);

        let Json(listing) = service.read_students().await;
        assert_eq!(listing.students[0].age, 21);
        assert_eq!(listing.students[0].name, "John Doe");

        let deleted = service
            .delete_student(Parameters(DeleteStudentInput { id }))
            .await;
        assert_eq!(deleted, DELETED);
        assert_eq!(service.read_students().await.0.count, 0);
    }

    #[tokio::test]
    async fn test_create_blank_fields_is_invalid_params() {
        let file = NamedTempFile::new().unwrap();
        let service = service_with_table(&file).await;

        let err = service
            .create_student(create_input("   ", 20, ""))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("'name' is required"));

        let via_action = service
            .perform_action(Parameters(PerformActionInput {
                action: "create".to_string(),
                id: None,
                name: Some("   ".to_string()),
                age: Some(20),
                grade: Some(String::new()),
                format: OutputFormat::Json,
            }))
            .await;
        assert!(via_action.contains("'name' is required for create"));

        assert_eq!(service.read_students().await.0.count, 0);
    }
}
