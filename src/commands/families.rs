use serde_json::json;

use super::{CommandOutput, ListOptions, Session, list_command, mutation_output, submit_form};
use crate::cli::OutputOptions;
use crate::error::{KeepsakeError, Result};
use crate::form::{FamilyForm, FormController, InviteForm};
use crate::model::{Family, FamilyRole, UserSummary};
use crate::types::RecordId;

pub async fn cmd_families_ls(options: ListOptions) -> Result<()> {
    list_command::<Family>(options).await
}

pub async fn cmd_families_create(
    name: String,
    description: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let mut form = FormController::<FamilyForm>::new();
    form.open_create(session.today);
    form.edit(|values| {
        values.name = name;
        values.description = description.unwrap_or_default();
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Family>("created", outcome, &session.i18n)?.print(output)
}

/// Invite an existing account, picked by name or email, into a family
pub async fn cmd_families_invite(
    family: &str,
    user: &str,
    relationship: String,
    role: FamilyRole,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let candidates = session.gateway.search_users(user).await?;
    let invitee = pick_user(user, candidates)?;

    let form = InviteForm {
        user: Some(invitee.clone()),
        role,
        relationship,
    };
    let invitation = form.build()?;
    session
        .gateway
        .invite_member(&RecordId::from(family), &invitation)
        .await?;

    CommandOutput::new(json!({
        "family_id": family,
        "user": invitee,
        "role": invitation.role,
        "relationship": invitation.relationship,
    }))
    .with_text(format!(
        "Invited {} to family {family} as {}",
        invitee.email, invitation.role
    ))
    .print(output)
}

/// An exact email match wins; otherwise the lookup has to be unambiguous.
fn pick_user(query: &str, candidates: Vec<UserSummary>) -> Result<UserSummary> {
    let query = query.trim();
    if let Some(exact) = candidates
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(query))
    {
        return Ok(exact.clone());
    }
    match candidates.len() {
        0 => Err(KeepsakeError::NotFound(format!("no account matches '{query}'"))),
        1 => Ok(candidates.into_iter().next().ok_or_else(|| {
            KeepsakeError::NotFound(format!("no account matches '{query}'"))
        })?),
        n => Err(KeepsakeError::Other(format!(
            "'{query}' matches {n} accounts: {}",
            candidates
                .iter()
                .map(|u| u.email.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, email: &str) -> UserSummary {
        UserSummary {
            id: RecordId::from(id),
            email: email.to_string(),
            display_name: String::new(),
        }
    }

    #[test]
    fn test_pick_user_prefers_exact_email() {
        let picked = pick_user(
            "Rose@example.com",
            vec![
                summary("1", "rosemary@example.com"),
                summary("2", "rose@example.com"),
            ],
        )
        .unwrap();
        assert_eq!(picked.id.as_str(), "2");
    }

    #[test]
    fn test_pick_user_rejects_ambiguous_and_empty() {
        let err = pick_user(
            "ro",
            vec![summary("1", "rose@example.com"), summary("2", "ron@example.com")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("matches 2 accounts"));
        assert!(matches!(
            pick_user("nobody", Vec::new()),
            Err(KeepsakeError::NotFound(_))
        ));
        assert_eq!(
            pick_user("ro", vec![summary("1", "rose@example.com")])
                .unwrap()
                .email,
            "rose@example.com"
        );
    }
}
