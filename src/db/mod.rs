//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Per-call connection provider
//! - Parameterized statement builder
//! - Statement execution with transactions and timeouts
//! - Student repository combining the three

pub mod executor;
pub mod params;
pub mod provider;
pub mod repository;
pub mod statement;

pub use executor::StatementExecutor;
pub use provider::{ConnectionProvider, DbConnection};
pub use repository::StudentRepository;
pub use statement::{SqlParam, Statement, StudentStatements};
