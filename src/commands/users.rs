use serde_json::json;

use super::{CommandOutput, ListOptions, Session, delete_command, list_command, mutation_output};
use crate::cli::OutputOptions;
use crate::display::{dimmed, heading};
use crate::error::{KeepsakeError, Result};
use crate::gateway::{MutationIntent, ResourceGateway};
use crate::model::{Role, User, UserRoleUpdate};
use crate::search::{MIN_LOOKUP_CHARS, UserLookup};
use crate::types::RecordId;

pub async fn cmd_users_ls(options: ListOptions) -> Result<()> {
    list_command::<User>(options).await
}

/// Change the role of an account
pub async fn cmd_users_role(id: &str, role: Role, output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    let intent = MutationIntent::Update(RecordId::from(id), UserRoleUpdate { role });
    let outcome = session.gateway.mutate::<User>(intent).await?;
    mutation_output::<User>("updated", Some(outcome), &session.i18n)?.print(output)
}

pub async fn cmd_users_rm(id: &str, output: OutputOptions) -> Result<()> {
    delete_command::<User>(id, output).await
}

/// Find accounts by name or email through the debounced lookup
pub async fn cmd_users_lookup(text: &str, output: OutputOptions) -> Result<()> {
    if text.trim().chars().count() < MIN_LOOKUP_CHARS {
        return Err(KeepsakeError::Other(format!(
            "lookup text must be at least {MIN_LOOKUP_CHARS} characters"
        )));
    }

    let session = Session::open()?;
    let lookup = UserLookup::new(session.gateway, session.config.debounce());
    let users = lookup
        .keystroke(text)
        .await
        .unwrap_or_else(|| Ok(Vec::new()))?;

    let mut text_output = String::new();
    if users.is_empty() {
        text_output.push_str(&dimmed("No matching accounts"));
    } else {
        for user in &users {
            text_output.push_str(&format!(
                "{}  {} <{}>\n",
                heading(&format!("{:8}", user.id.as_str())),
                user.display_name,
                user.email
            ));
        }
    }

    CommandOutput::new(json!({ "users": users }))
        .with_text(text_output.trim_end())
        .print(output)
}
