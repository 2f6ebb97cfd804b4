use std::path::PathBuf;

use super::{ListOptions, delete_command, list_command, upload_command};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::model::{Video, VideoMetadata};
use crate::upload::UploadTarget;

/// List videos. The caller scopes the query to a kid or an album.
pub async fn cmd_videos_ls(options: ListOptions) -> Result<()> {
    list_command::<Video>(options).await
}

pub async fn cmd_videos_upload(
    files: Vec<PathBuf>,
    metadata: VideoMetadata,
    output: OutputOptions,
) -> Result<()> {
    upload_command(files, UploadTarget::Videos(metadata), output).await
}

pub async fn cmd_videos_rm(id: &str, output: OutputOptions) -> Result<()> {
    delete_command::<Video>(id, output).await
}
