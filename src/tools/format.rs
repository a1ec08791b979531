//! Output formatting for student listings.
//!
//! Read results leave the dispatcher as text. JSON is the default; the table
//! and markdown renderings are meant for humans reading CLI or chat output.

use crate::models::Student;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

const COLUMNS: [&str; 4] = ["ID", "Name", "Age", "Grade"];

/// Output format for student listings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array (default)
    #[default]
    Json,
    /// ASCII table format (like MySQL CLI)
    Table,
    /// Markdown table format
    Markdown,
}

pub fn format_students(students: &[Student], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_as_json(students),
        OutputFormat::Table => format_as_table(students),
        OutputFormat::Markdown => format_as_markdown(students),
    }
}

pub fn format_as_json(students: &[Student]) -> String {
    // Serializing plain structs of strings and integers cannot fail.
    serde_json::to_string(students).unwrap_or_else(|_| "[]".to_string())
}

fn cells(student: &Student) -> [String; 4] {
    [
        student.id.to_string(),
        student.name.clone(),
        student.age.to_string(),
        student.grade.clone(),
    ]
}

pub fn format_as_table(students: &[Student]) -> String {
    if students.is_empty() {
        return "Empty set".to_string();
    }

    let rows: Vec<[String; 4]> = students.iter().map(cells).collect();
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.width()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut output = String::new();
    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    output.push_str(&separator);
    let header: String = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("| {} ", pad_center(col, *w)))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in &rows {
        let row_str: String = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                // ID and Age are numeric and right-aligned.
                if i == 0 || i == 2 {
                    format!("| {}{} ", " ".repeat(w - cell.width()), cell)
                } else {
                    format!("| {}{} ", cell, " ".repeat(w - cell.width()))
                }
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&separator);
    let row_text = if rows.len() == 1 { "row" } else { "rows" };
    output.push_str(&format!("{} {} in set\n", rows.len(), row_text));

    output
}

fn pad_center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

pub fn format_as_markdown(students: &[Student]) -> String {
    if students.is_empty() {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();
    let header: String = COLUMNS.iter().map(|c| format!("| {} ", c)).collect::<String>() + "|\n";
    output.push_str(&header);
    output.push_str(&("|---".repeat(COLUMNS.len()) + "|\n"));

    for student in students {
        let row: String = cells(student)
            .iter()
            .map(|cell| format!("| {} ", cell.replace('|', "\\|")))
            .collect::<String>()
            + "|\n";
        output.push_str(&row);
    }

    output.push_str(&format!("\n*{} rows*", students.len()));
    output
}
