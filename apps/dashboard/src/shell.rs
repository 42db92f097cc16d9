//! Line-oriented front end: one command per line, view redrawn after each.

use std::io::Write;

use anyhow::Result;
use client_core::DashboardClient;
use shared::domain::{DraftField, SortKey, UserId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::render::render;

const HELP: &str = "\
commands:
  list                     redraw the current page
  search <text>            filter by name or email (empty clears)
  sort <id|name|email|city|none>
                           sort by column; repeat to flip direction
  next | prev | page <n>   move between pages
  edit <id>                load a user into the form
  set <name|email|city> <value>
                           change a form field
  clear [id]               empty the form, or only drop the selected id
  submit                   add or update, depending on the form
  update                   update the selected user
  delete <id>              remove a user
  theme                    switch light/dark
  reload                   fetch the user list again
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Sort(SortKey),
    Next,
    Prev,
    Page(usize),
    Edit(UserId),
    Set(DraftField, String),
    Clear,
    ClearId,
    Submit,
    Update,
    Delete(UserId),
    Theme,
    Reload,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "search" => ShellCommand::Search(rest.to_string()),
        "sort" => ShellCommand::Sort(rest.parse()?),
        "next" => ShellCommand::Next,
        "prev" | "previous" => ShellCommand::Prev,
        "page" => ShellCommand::Page(parse_number(rest, "page")?),
        "edit" => ShellCommand::Edit(UserId(parse_number(rest, "user id")?)),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            ShellCommand::Set(field.parse()?, value.to_string())
        }
        "clear" if rest.eq_ignore_ascii_case("id") => ShellCommand::ClearId,
        "clear" if rest.is_empty() => ShellCommand::Clear,
        "submit" | "save" => ShellCommand::Submit,
        "update" => ShellCommand::Update,
        "delete" | "rm" => ShellCommand::Delete(UserId(parse_number(rest, "user id")?)),
        "theme" => ShellCommand::Theme,
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "" => return Err("empty command".to_string()),
        _ => return Err(format!("unknown command '{line}', try 'help'")),
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("expected a {what}, got '{raw}'"))
}

/// Applies one command. Returns `false` once the operator asked to quit.
///
/// Dashboard errors are not returned here: the client keeps the message and
/// the next render shows it.
pub async fn execute(
    client: &DashboardClient,
    command: ShellCommand,
    out: &mut impl Write,
) -> Result<bool> {
    debug!(?command, "shell command");
    match command {
        ShellCommand::List => {}
        ShellCommand::Search(text) => client.set_search(text).await,
        ShellCommand::Sort(key) => client.toggle_sort(key).await,
        ShellCommand::Next => {
            client.next_page().await;
        }
        ShellCommand::Prev => {
            client.previous_page().await;
        }
        ShellCommand::Page(page) => client.set_page(page).await,
        ShellCommand::Edit(id) => {
            let _ = client.begin_edit(id).await;
        }
        ShellCommand::Set(field, value) => client.set_draft_field(field, value).await,
        ShellCommand::Clear => client.reset_draft().await,
        ShellCommand::ClearId => client.clear_draft_id().await,
        ShellCommand::Submit => {
            if let Ok(record) = client.submit().await {
                writeln!(out, "saved user {}", record.id)?;
            }
        }
        ShellCommand::Update => {
            if let Ok(record) = client.submit_update().await {
                writeln!(out, "updated user {}", record.id)?;
            }
        }
        ShellCommand::Delete(id) => {
            if client.delete_user(id).await.is_ok() {
                writeln!(out, "deleted user {id}")?;
            }
        }
        ShellCommand::Theme => {
            client.toggle_theme().await;
        }
        ShellCommand::Reload => {
            let _ = client.load_users().await;
        }
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(true);
        }
        ShellCommand::Quit => return Ok(false),
    }

    write!(out, "{}", render(&client.snapshot().await))?;
    Ok(true)
}

pub async fn run<R>(client: &DashboardClient, input: R, out: &mut impl Write) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    write!(out, "{}", render(&client.snapshot().await))?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if !execute(client, command, out).await? {
                    break;
                }
            }
            Err(message) => writeln!(out, "{message}")?,
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
