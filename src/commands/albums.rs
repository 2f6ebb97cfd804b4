use serde_json::json;

use super::{CommandOutput, ListOptions, Session, list_command, mutation_output, submit_form};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::form::{AlbumForm, FormController, ShareForm};
use crate::gateway::ResourceGateway;
use crate::model::{Album, Privacy};
use crate::types::RecordId;

pub async fn cmd_albums_ls(options: ListOptions) -> Result<()> {
    list_command::<Album>(options).await
}

pub async fn cmd_albums_create(
    title: String,
    description: Option<String>,
    privacy: Option<Privacy>,
    kid: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let mut form = FormController::<AlbumForm>::new();
    form.open_create(session.today);
    form.edit(|values| {
        values.title = title;
        values.description = description.unwrap_or_default();
        if let Some(privacy) = privacy {
            values.privacy = privacy;
        }
        values.kid_id = kid.map(RecordId::from);
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Album>("created", outcome, &session.i18n)?.print(output)
}

pub async fn cmd_albums_edit(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    privacy: Option<Privacy>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let album = session
        .gateway
        .fetch_one::<Album>(&RecordId::from(id))
        .await?;

    let mut form = FormController::<AlbumForm>::new();
    form.open_edit(&album);
    form.edit(|values| {
        if let Some(title) = title {
            values.title = title;
        }
        if let Some(description) = description {
            values.description = description;
        }
        if let Some(privacy) = privacy {
            values.privacy = privacy;
        }
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Album>("updated", outcome, &session.i18n)?.print(output)
}

/// Publish an album behind a share link
pub async fn cmd_albums_share(
    id: &str,
    password: Option<String>,
    expires_in_days: Option<u32>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let form = ShareForm {
        password: password.unwrap_or_default(),
        expires_in_days,
    };
    let request = form.build()?;
    let link = session
        .gateway
        .share_album(&RecordId::from(id), &request)
        .await?;

    let mut text = format!("Shared album {id}");
    match &link.url {
        Some(url) => text.push_str(&format!("\n{url}")),
        None => text.push_str(&format!("\ntoken: {}", link.share_token)),
    }
    if let Some(expires_at) = &link.expires_at {
        text.push_str(&format!("\nexpires: {expires_at}"));
    }
    CommandOutput::new(json!({ "album_id": id, "link": link }))
        .with_text(text)
        .print(output)
}

pub async fn cmd_albums_unshare(id: &str, output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    session.gateway.unshare_album(&RecordId::from(id)).await?;
    CommandOutput::new(json!({ "album_id": id, "shared": false }))
        .with_text(format!("Revoked share link of album {id}"))
        .print(output)
}
