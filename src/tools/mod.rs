//! Agent-facing tool implementations.
//!
//! - `student`: create, read, update and delete student records
//! - `dispatch`: run one of the above from an action keyword
//! - `format`: render student listings as JSON, ASCII table or markdown

pub mod dispatch;
pub mod format;
pub mod student;

pub use dispatch::ActionDispatcher;
pub use format::OutputFormat;
pub use student::StudentTools;
