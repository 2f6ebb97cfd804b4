use std::path::PathBuf;

use serde_json::json;

use super::{CommandOutput, ListOptions, Session, list_command, upload_command};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::model::{Photo, PhotoMetadata};
use crate::types::RecordId;
use crate::upload::UploadTarget;

pub async fn cmd_photos_ls(options: ListOptions) -> Result<()> {
    list_command::<Photo>(options).await
}

pub async fn cmd_photos_upload(
    files: Vec<PathBuf>,
    metadata: PhotoMetadata,
    output: OutputOptions,
) -> Result<()> {
    upload_command(files, UploadTarget::Photos(metadata), output).await
}

pub async fn cmd_photos_like(id: &str, liked: bool, output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    session
        .gateway
        .set_photo_like(&RecordId::from(id), liked)
        .await?;
    let verb = if liked { "Liked" } else { "Unliked" };
    CommandOutput::new(json!({ "photo_id": id, "liked": liked }))
        .with_text(format!("{verb} photo {id}"))
        .print(output)
}

/// Count one view of a photo
pub async fn cmd_photos_view(id: &str, output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    session.gateway.record_photo_view(&RecordId::from(id)).await?;
    CommandOutput::new(json!({ "photo_id": id, "viewed": true }))
        .with_text(format!("Recorded a view of photo {id}"))
        .print(output)
}
