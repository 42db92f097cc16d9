//! Plain-text rendering of a dashboard snapshot.

use std::fmt::Write as _;

use client_core::{DashboardSnapshot, FormMode};
use shared::domain::{SortDirection, SortKey, UserRecord};

const HEADERS: [&str; 4] = ["ID", "Name", "Email", "City"];

pub fn render(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "User Management Dashboard ({} mode)  [{}]",
        snapshot.theme,
        snapshot.theme.toggle_label()
    );
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if snapshot.loading {
        let _ = writeln!(out, "Loading...");
    }
    let _ = writeln!(out, "{}", query_line(snapshot));
    out.push_str(&render_table(&snapshot.window.rows));
    let _ = writeln!(out, "{}", pagination_line(snapshot));
    let _ = writeln!(out, "{}", form_line(snapshot));
    out
}

pub fn render_table(rows: &[UserRecord]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.name.clone(),
                row.email.clone(),
                if row.city.is_empty() {
                    "N/A".to_string()
                } else {
                    row.city.clone()
                },
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    if cells.is_empty() {
        let _ = writeln!(out, "(no users)");
    }
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

fn query_line(snapshot: &DashboardSnapshot) -> String {
    let sort = match snapshot.sort_key {
        SortKey::None => "none".to_string(),
        key => {
            let arrow = match snapshot.sort_direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            format!("{} {arrow}", format!("{key:?}").to_lowercase())
        }
    };
    format!(
        "Search: \"{}\"  Sort: {}  Matches: {} of {}",
        snapshot.search_text, sort, snapshot.window.filtered_count, snapshot.total
    )
}

/// Controls that are unavailable are hidden, not greyed out.
fn pagination_line(snapshot: &DashboardSnapshot) -> String {
    let mut parts = Vec::new();
    if snapshot.window.has_previous {
        parts.push("[prev]".to_string());
    }
    parts.push(format!("Page {}", snapshot.window.page));
    if snapshot.window.has_next {
        parts.push("[next]".to_string());
    }
    parts.join(" ")
}

fn form_line(snapshot: &DashboardSnapshot) -> String {
    let draft = &snapshot.draft;
    let mode = match snapshot.mode {
        FormMode::Create => "add user".to_string(),
        FormMode::Edit => format!("update user {}", draft.id),
    };
    format!(
        "Form ({mode}): name=\"{}\" email=\"{}\" city=\"{}\"",
        draft.name, draft.email, draft.city
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{Draft, ViewWindow};
    use shared::domain::{Theme, UserFields, UserId};

    fn snapshot(rows: Vec<UserRecord>) -> DashboardSnapshot {
        let count = rows.len();
        DashboardSnapshot {
            window: ViewWindow {
                rows,
                page: 1,
                filtered_count: count,
                has_previous: false,
                has_next: false,
            },
            total: count,
            search_text: String::new(),
            sort_key: SortKey::None,
            sort_direction: SortDirection::Asc,
            draft: Draft::default(),
            mode: FormMode::Create,
            theme: Theme::Light,
            loading: false,
            error: None,
        }
    }

    #[test]
    fn table_pads_columns_and_marks_missing_city() {
        let rows = vec![
            UserRecord::new(UserId(1), UserFields::new("Ann Lee", "a@x.com", "Gotham")),
            UserRecord::new(UserId(12), UserFields::new("Bo", "bo@example.com", "")),
        ];
        let table = render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID | Name    | Email          | City");
        assert_eq!(lines[2], "1  | Ann Lee | a@x.com        | Gotham");
        assert_eq!(lines[3], "12 | Bo      | bo@example.com | N/A");
    }

    #[test]
    fn empty_window_says_so() {
        assert!(render_table(&[]).contains("(no users)"));
    }

    #[test]
    fn hides_unavailable_page_controls() {
        let mut view = snapshot(Vec::new());
        assert_eq!(pagination_line(&view), "Page 1");
        view.window.page = 2;
        view.window.has_previous = true;
        view.window.has_next = true;
        assert_eq!(pagination_line(&view), "[prev] Page 2 [next]");
    }

    #[test]
    fn shows_status_theme_and_edit_mode() {
        let mut view = snapshot(Vec::new());
        view.loading = true;
        view.error = Some("Failed to fetch users: No response from server".to_string());
        view.theme = Theme::Dark;
        view.mode = FormMode::Edit;
        view.draft.id = "4".to_string();
        view.sort_key = SortKey::Email;
        view.sort_direction = SortDirection::Desc;

        let text = render(&view);
        assert!(text.starts_with("User Management Dashboard (dark mode)  [Switch to Light Mode]"));
        assert!(text.contains("Error: Failed to fetch users: No response from server"));
        assert!(text.contains("Loading..."));
        assert!(text.contains("Sort: email desc"));
        assert!(text.contains("Form (update user 4)"));
    }
}
