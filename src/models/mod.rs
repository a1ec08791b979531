//! Data models for the student MCP server.
//!
//! This module re-exports all model types used throughout the application.

pub mod action;
pub mod connection;
pub mod student;

pub use action::{Action, ActionRequest};
pub use connection::{ConnectionConfig, ConnectionConfigError, DEFAULT_TABLE, DatabaseType};
pub use student::{NewStudent, Student, StudentUpdate};
