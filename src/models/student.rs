//! Student record models.

use crate::error::{DbError, DbResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A row of the students table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Student {
    /// Unique student identifier
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: i32,
    #[serde(rename = "Grade")]
    pub grade: String,
}

/// Fields for inserting a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Explicit identifier. When `None` the database assigns one.
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub grade: String,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, age: i32, grade: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            age,
            grade: grade.into(),
        }
    }

    /// Build from caller-supplied values. Blank strings count as not supplied,
    /// so a blank name or grade fails like a missing one.
    pub fn try_from_optional(
        id: Option<i64>,
        name: Option<String>,
        age: Option<i32>,
        grade: Option<String>,
    ) -> DbResult<Self> {
        Ok(Self {
            id,
            name: required(non_blank(name), "name")?,
            age: required(age, "age")?,
            grade: required(non_blank(grade), "grade")?,
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn required<T>(value: Option<T>, field: &str) -> DbResult<T> {
    value.ok_or_else(|| DbError::invalid_input(format!("'{}' is required for create", field)))
}

/// The set of fields an update may change. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub grade: Option<String>,
}

impl StudentUpdate {
    /// Build an update from caller-supplied values. Blank strings count as not supplied.
    pub fn from_optional(name: Option<String>, age: Option<i32>, grade: Option<String>) -> Self {
        Self {
            name: non_blank(name),
            age,
            grade: non_blank(grade),
        }
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

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.grade.is_none()
    }
}
