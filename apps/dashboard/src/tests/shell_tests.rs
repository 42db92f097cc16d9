use super::*;
use std::sync::Arc;

use async_trait::async_trait;
use client_core::{MirrorPolicy, UserService};
use shared::{
    domain::{UserFields, UserRecord},
    error::RemoteError,
    protocol::UserPayload,
};

struct FixedUserService(Vec<UserRecord>);

#[async_trait]
impl UserService for FixedUserService {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        Ok(self.0.clone())
    }

    async fn create_user(&self, _user: &UserPayload) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn update_user(&self, _user: &UserPayload) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn delete_user(&self, _id: UserId) -> Result<(), RemoteError> {
        Err(RemoteError::NoResponse)
    }
}

async fn client() -> DashboardClient {
    let users = (1..=6)
        .map(|id| {
            UserRecord::new(
                UserId(id),
                UserFields::new(
                    format!("User Number {id}"),
                    format!("user{id}@example.com"),
                    "Springfield",
                ),
            )
        })
        .collect();
    let client = DashboardClient::new(
        Arc::new(FixedUserService(users)),
        MirrorPolicy::LocalAuthoritative,
    );
    client.load_users().await.expect("load");
    client
}

#[test]
fn parses_commands_with_arguments() {
    assert_eq!(parse_command("sort Name"), Ok(ShellCommand::Sort(SortKey::Name)));
    assert_eq!(parse_command("  page 3 "), Ok(ShellCommand::Page(3)));
    assert_eq!(
        parse_command("set city New York"),
        Ok(ShellCommand::Set(DraftField::City, "New York".to_string()))
    );
    assert_eq!(
        parse_command("search Jane Doe"),
        Ok(ShellCommand::Search("Jane Doe".to_string()))
    );
    assert_eq!(parse_command("search"), Ok(ShellCommand::Search(String::new())));
    assert_eq!(parse_command("clear id"), Ok(ShellCommand::ClearId));
    assert_eq!(parse_command("rm 4"), Ok(ShellCommand::Delete(UserId(4))));
}

#[test]
fn rejects_bad_input() {
    assert!(parse_command("sort age").is_err());
    assert!(parse_command("edit bob").is_err());
    assert!(parse_command("set phone 555").is_err());
    assert!(parse_command("clear everything").is_err());
    assert!(parse_command("dance").is_err());
}

#[tokio::test]
async fn session_adds_a_user_and_pages_forward() {
    let client = client().await;
    let script = "set name Alice Smith\nset email alice@x.com\nset city Paris\nsubmit\nnext\nquit\nlist\n";
    let mut out = Vec::new();
    run(&client, script.as_bytes(), &mut out).await.expect("run");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("saved user 7"));
    assert!(text.contains("Alice Smith"));
    assert!(text.contains("[prev] Page 2"));
    assert_eq!(client.users().await.len(), 7);
}

#[tokio::test]
async fn failed_commands_surface_in_the_view() {
    let client = client().await;
    let script = "edit 99\nupdate\ndelete 2\n";
    let mut out = Vec::new();
    run(&client, script.as_bytes(), &mut out).await.expect("run");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Error: User not found"));
    assert!(text.contains("Error: Please select a user to update"));
    assert!(text.contains("Error: Failed to delete user: No response from server"));
    assert!(!text.contains("deleted user 2"));
    assert_eq!(client.users().await.len(), 5, "local delete stands");
}

#[tokio::test]
async fn help_and_unknown_commands_do_not_stop_the_loop() {
    let client = client().await;
    let mut out = Vec::new();
    run(&client, "dance\nhelp\ntheme\n".as_bytes(), &mut out)
        .await
        .expect("run");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("unknown command 'dance'"));
    assert!(text.contains("commands:"));
    assert!(text.contains("(dark mode)"));
}
