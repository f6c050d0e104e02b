//! Terminal rendering and input validation for the task client.
//!
//! Mirrors `public/app.js`: one row per task, cost shown as currency, and
//! tasks costing 1000 or more flagged for emphasis.

use thiserror::Error;

use crate::task_store::{Task, TaskFields};

/// Tasks at or above this cost are emphasized.
pub const HIGHLIGHT_COST_THRESHOLD: f64 = 1000.0;

/// Marker printed in front of emphasized rows.
pub const HIGHLIGHT_MARKER: &str = "!";

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Cost must be a number, got {0:?}")]
    InvalidCost(String),
}

pub fn is_highlighted(task: &Task) -> bool {
    task.cost >= HIGHLIGHT_COST_THRESHOLD
}

/// Format a cost as Brazilian reais, e.g. `R$ 12.50`.
pub fn format_cost(cost: f64) -> String {
    format!("R$ {:.2}", cost)
}

pub fn render_row(task: &Task) -> String {
    let marker = if is_highlighted(task) {
        HIGHLIGHT_MARKER
    } else {
        " "
    };
    format!(
        "{} #{:<4} {:<30} {:>14}  {}",
        marker,
        task.id,
        task.name,
        format_cost(task.cost),
        task.due_date
    )
}

pub fn render_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "Nenhuma tarefa cadastrada.".to_string();
    }
    tasks
        .iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate raw user input for a create or edit.
///
/// Every field must be non-empty and the cost must parse as a finite number.
/// The due date is passed through untouched.
pub fn parse_task_input(name: &str, cost: &str, due_date: &str) -> Result<TaskFields, InputError> {
    let name = name.trim();
    let cost = cost.trim();
    let due_date = due_date.trim();

    if name.is_empty() {
        return Err(InputError::MissingField("nome"));
    }
    if cost.is_empty() {
        return Err(InputError::MissingField("custo"));
    }
    if due_date.is_empty() {
        return Err(InputError::MissingField("data_limite"));
    }

    let cost_value: f64 = cost
        .replace(',', ".")
        .parse()
        .map_err(|_| InputError::InvalidCost(cost.to_string()))?;
    if !cost_value.is_finite() {
        return Err(InputError::InvalidCost(cost.to_string()));
    }

    Ok(TaskFields::new(name, cost_value, due_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(cost: f64) -> Task {
        Task {
            id: 1,
            name: "Rent".to_string(),
            cost,
            due_date: "2025-02-01".to_string(),
            order: 1,
        }
    }

    #[test]
    fn highlight_starts_at_one_thousand() {
        assert!(is_highlighted(&task(1000.0)));
        assert!(is_highlighted(&task(2500.0)));
        assert!(!is_highlighted(&task(999.99)));
    }

    #[test]
    fn rows_carry_the_marker_only_when_highlighted() {
        assert!(render_row(&task(1000.0)).starts_with(HIGHLIGHT_MARKER));
        assert!(render_row(&task(12.5)).starts_with(' '));
        assert!(render_row(&task(12.5)).contains("R$ 12.50"));
    }

    #[test]
    fn empty_list_has_a_placeholder() {
        assert_eq!(render_list(&[]), "Nenhuma tarefa cadastrada.");
        assert_eq!(render_list(&[task(1.0), task(2.0)]).lines().count(), 2);
    }

    #[test]
    fn parse_task_input_accepts_valid_fields() {
        let fields = parse_task_input(" Buy milk ", "12,5", "2025-01-10").unwrap();
        assert_eq!(fields, TaskFields::new("Buy milk", 12.5, "2025-01-10"));
    }

    #[test]
    fn parse_task_input_rejects_blank_fields() {
        assert_eq!(
            parse_task_input("", "1", "2025-01-10"),
            Err(InputError::MissingField("nome"))
        );
        assert_eq!(
            parse_task_input("a", " ", "2025-01-10"),
            Err(InputError::MissingField("custo"))
        );
        assert_eq!(
            parse_task_input("a", "1", ""),
            Err(InputError::MissingField("data_limite"))
        );
    }

    #[test]
    fn parse_task_input_rejects_non_numeric_cost() {
        assert!(matches!(
            parse_task_input("a", "cheap", "2025-01-10"),
            Err(InputError::InvalidCost(_))
        ));
        assert!(matches!(
            parse_task_input("a", "NaN", "2025-01-10"),
            Err(InputError::InvalidCost(_))
        ));
    }
}
