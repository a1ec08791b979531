//! Action models for the dispatcher.
//!
//! An action keyword selects exactly one CRUD tool. Parsing is the only place
//! free-form text is accepted; everything downstream matches on [`Action`].

use crate::error::DbError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The four operations the dispatcher can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Insert a new student (requires name, age, grade)
    Create,
    /// List all students
    Read,
    /// Change some fields of a student (requires id)
    Update,
    /// Remove a student (requires id)
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether the action changes stored data.
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DbError::unknown_action(trimmed))
    }
}

/// A requested action plus whatever fields the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ActionRequest {
    /// Action keyword: create, read, update or delete
    pub action: String,
    /// Student ID. Required for update and delete; optional explicit ID for create.
    #[serde(default)]
    pub id: Option<i64>,
    /// Student name
    #[serde(default)]
    pub name: Option<String>,
    /// Student age
    #[serde(default)]
    pub age: Option<i32>,
    /// Student grade, e.g. "A"
    #[serde(default)]
    pub grade: Option<String>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }
}
