//! Command-line client for the task API.
//!
//! Usage:
//!   tarefas-cli list
//!   tarefas-cli add <nome> <custo> <data_limite>
//!   tarefas-cli edit <id> <nome> <custo> <data_limite>
//!   tarefas-cli delete <id> [--yes]
//!   tarefas-cli move <id> <up|down>
//!
//! The server is read from `TAREFAS_API_URL` (default `http://localhost:3000`).
//! Every mutation prints the refreshed list afterwards.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context};
use tarefas::client::render::{parse_task_input, render_list};
use tarefas::client::{ClientError, TaskClient};
use tarefas::{MoveDirection, TaskFields};

const USAGE: &str = "usage: tarefas-cli <list | add NOME CUSTO DATA | edit ID NOME CUSTO DATA | delete ID [--yes] | move ID up|down>";

/// A command line, validated before anything is sent to the server.
#[derive(Debug, PartialEq)]
enum Command {
    List,
    Add(TaskFields),
    Edit { id: i64, fields: TaskFields },
    /// `confirmed` is set by `--yes`/`-y`; otherwise the user is asked.
    Delete { id: i64, confirmed: bool },
    Move { id: i64, direction: MoveDirection },
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    let parsed = match (command.as_str(), &args[1..]) {
        ("list", []) => Command::List,
        ("add", [name, cost, due_date]) => Command::Add(parse_task_input(name, cost, due_date)?),
        ("edit", [id, name, cost, due_date]) => Command::Edit {
            id: parse_id(id)?,
            fields: parse_task_input(name, cost, due_date)?,
        },
        ("delete", [id, rest @ ..]) => Command::Delete {
            id: parse_id(id)?,
            confirmed: rest.iter().any(|a| a == "--yes" || a == "-y"),
        },
        ("move", [id, direction]) => Command::Move {
            id: parse_id(id)?,
            direction: match direction.as_str() {
                "up" => MoveDirection::Up,
                "down" => MoveDirection::Down,
                other => bail!("direction must be up or down, got {:?}", other),
            },
        },
        _ => bail!(USAGE),
    };
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;
    let client = TaskClient::from_env();

    match command {
        Command::List => {}
        Command::Add(fields) => {
            report(client.create(&fields).await.map(|task| {
                format!("Tarefa criada: #{} (ordem {})", task.id, task.order)
            }))?;
        }
        Command::Edit { id, fields } => {
            report(client.update(id, &fields).await)?;
        }
        Command::Delete { id, confirmed } => {
            if !confirmed && !confirm("Tem certeza que deseja excluir esta tarefa?")? {
                return Ok(());
            }
            report(client.delete(id).await)?;
        }
        Command::Move { id, direction } => {
            report(client.move_task(id, direction).await)?;
        }
    }

    let tasks = client
        .list()
        .await
        .with_context(|| format!("Failed to list tasks from {}", client.base_url()))?;
    println!("{}", render_list(&tasks));
    Ok(())
}

fn parse_id(raw: &str) -> anyhow::Result<i64> {
    raw.parse()
        .map_err(|_| anyhow!("task id must be an integer, got {:?}", raw))
}

/// Print a server confirmation, or surface the server's error message.
/// API errors don't abort: the refreshed list is still shown.
fn report(result: Result<String, ClientError>) -> anyhow::Result<()> {
    match result {
        Ok(message) => println!("{}", message),
        Err(ClientError::Api { message, .. }) => eprintln!("Erro: {}", message),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{} [s/N] ", question)?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn missing_or_unknown_command_prints_usage() {
        for line in ["", "lista", "list extra", "add Rent 10", "move 1"] {
            let err = parse_command(&args(line)).unwrap_err();
            assert_eq!(err.to_string(), USAGE, "for {:?}", line);
        }
    }

    #[test]
    fn move_requires_a_known_direction() {
        let err = parse_command(&args("move 1 sideways")).unwrap_err();
        assert!(err.to_string().contains("sideways"));

        assert_eq!(
            parse_command(&args("move 4 down")).unwrap(),
            Command::Move {
                id: 4,
                direction: MoveDirection::Down
            }
        );
    }

    #[test]
    fn ids_must_be_integers() {
        let err = parse_command(&args("delete abc")).unwrap_err();
        assert!(err.to_string().contains("abc"));
        assert!(parse_command(&args("edit 1.5 Rent 10 2025-01-01")).is_err());
    }

    #[test]
    fn add_and_edit_validate_fields() {
        assert_eq!(
            parse_command(&args("add Rent 1500,50 2025-02-01")).unwrap(),
            Command::Add(TaskFields::new("Rent", 1500.5, "2025-02-01"))
        );
        assert_eq!(
            parse_command(&args("edit 2 Gym 80 2025-03-01")).unwrap(),
            Command::Edit {
                id: 2,
                fields: TaskFields::new("Gym", 80.0, "2025-03-01"),
            }
        );
        assert!(parse_command(&args("add Rent abc 2025-02-01")).is_err());
    }

    #[test]
    fn delete_asks_unless_told_yes() {
        assert_eq!(
            parse_command(&args("delete 3")).unwrap(),
            Command::Delete {
                id: 3,
                confirmed: false
            }
        );
        for flag in ["--yes", "-y"] {
            assert_eq!(
                parse_command(&args(&format!("delete 3 {}", flag))).unwrap(),
                Command::Delete {
                    id: 3,
                    confirmed: true
                }
            );
        }
    }
}
