//! End-to-end tests for the action dispatcher over a SQLite database.

use std::sync::Arc;
use student_mcp_server::db::StudentRepository;
use student_mcp_server::models::{ActionRequest, ConnectionConfig, Student};
use student_mcp_server::tools::{ActionDispatcher, OutputFormat, StudentTools};
use tempfile::NamedTempFile;

async fn setup_dispatcher() -> (ActionDispatcher, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let conn_url = format!("sqlite:{}", temp_file.path().to_str().unwrap());
    let config = ConnectionConfig::new(conn_url)
        .unwrap()
        .with_table("pupils")
        .unwrap();

    let repository = Arc::new(StudentRepository::new(config));
    repository.ensure_schema().await.unwrap();

    (ActionDispatcher::new(StudentTools::new(repository)), temp_file)
}

async fn read_json(dispatcher: &ActionDispatcher) -> Vec<Student> {
    let output = dispatcher
        .perform_action(ActionRequest::new("read"), OutputFormat::Json)
        .await;
    serde_json::from_str(&output).unwrap()
}

#[tokio::test]
async fn test_full_action_cycle() {
    let (dispatcher, _db) = setup_dispatcher().await;

    let created = dispatcher
        .perform_action(
            ActionRequest::new("create").name("John Doe").age(20).grade("A"),
            OutputFormat::Json,
        )
        .await;
    assert_eq!(created, "Student added successfully");

    let students = read_json(&dispatcher).await;
    assert_eq!(students.len(), 1);
    let id = students[0].id;

    let updated = dispatcher
        .perform_action(ActionRequest::new("Update").id(id).grade("B"), OutputFormat::Json)
        .await;
    assert_eq!(updated, "Student updated successfully");
    assert_eq!(read_json(&dispatcher).await[0].grade, "B");
    assert_eq!(read_json(&dispatcher).await[0].name, "John Doe");

    let deleted = dispatcher
        .perform_action(ActionRequest::new("DELETE").id(id), OutputFormat::Json)
        .await;
    assert_eq!(deleted, "Student deleted successfully");
    assert!(read_json(&dispatcher).await.is_empty());
}

#[tokio::test]
async fn test_read_json_uses_column_names() {
    let (dispatcher, _db) = setup_dispatcher().await;
    dispatcher
        .perform_action(
            ActionRequest::new("create").id(7).name("Ana").age(19).grade("A"),
            OutputFormat::Json,
        )
        .await;

    let output = dispatcher
        .perform_action(ActionRequest::new("read"), OutputFormat::Json)
        .await;
    assert_eq!(output, r#"[{"ID":7,"Name":"Ana","Age":19,"Grade":"A"}]"#);
}

#[tokio::test]
async fn test_read_table_format() {
    let (dispatcher, _db) = setup_dispatcher().await;
    assert_eq!(
        dispatcher
            .perform_action(ActionRequest::new("read"), OutputFormat::Table)
            .await,
        "Empty set"
    );

    dispatcher
        .perform_action(
            ActionRequest::new("create").id(1).name("John Doe").age(20).grade("A"),
            OutputFormat::Json,
        )
        .await;
    let table = dispatcher
        .perform_action(ActionRequest::new("read"), OutputFormat::Table)
        .await;
    assert!(table.contains("John Doe"));
    assert!(table.contains("| ID |"));
    assert!(table.trim_end().ends_with("1 row in set"), "got: {}", table);
}

#[tokio::test]
async fn test_read_markdown_format() {
    let (dispatcher, _db) = setup_dispatcher().await;
    dispatcher
        .perform_action(
            ActionRequest::new("create").name("A|B").age(20).grade("A"),
            OutputFormat::Json,
        )
        .await;
    let markdown = dispatcher
        .perform_action(ActionRequest::new("read"), OutputFormat::Markdown)
        .await;
    assert!(markdown.contains(r"A\|B"));
}

#[tokio::test]
async fn test_unknown_action_does_not_touch_database() {
    let (dispatcher, _db) = setup_dispatcher().await;

    let output = dispatcher
        .perform_action(ActionRequest::new("archive").id(1), OutputFormat::Json)
        .await;
    assert!(output.starts_with("Error performing action:"), "got: {}", output);
    assert!(output.contains("archive"));
    assert!(read_json(&dispatcher).await.is_empty());
}

#[tokio::test]
async fn test_create_missing_fields_rejected() {
    let (dispatcher, _db) = setup_dispatcher().await;

    let output = dispatcher
        .perform_action(ActionRequest::new("create").name("John Doe"), OutputFormat::Json)
        .await;
    assert!(output.starts_with("Error performing action:"), "got: {}", output);
    assert!(read_json(&dispatcher).await.is_empty());
}

#[tokio::test]
async fn test_update_without_fields_rejected() {
    let (dispatcher, _db) = setup_dispatcher().await;
    dispatcher
        .perform_action(
            ActionRequest::new("create").id(1).name("John Doe").age(20).grade("A"),
            OutputFormat::Json,
        )
        .await;

    let output = dispatcher
        .perform_action(ActionRequest::new("update").id(1).name("  "), OutputFormat::Json)
        .await;
    assert!(output.starts_with("Error updating student:"), "got: {}", output);
    assert_eq!(read_json(&dispatcher).await[0].name, "John Doe");
}
