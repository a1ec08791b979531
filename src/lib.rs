//! Student MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to create, read, update and delete student records in a SQL table
//! (MySQL, PostgreSQL, SQLite), plus an action dispatcher that routes a
//! keyword to the matching tool.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::StudentService;
