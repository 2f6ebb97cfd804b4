//! Photo and video uploads with per-file progress.
//!
//! Files are sent one at a time as multipart requests whose body is streamed
//! in fixed-size chunks; each chunk handed to the transport advances that
//! file's progress. Progress snapshots are published on a `watch` channel so
//! a view can render them while the batch runs. A failing file does not stop
//! the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream;
use reqwest::{Body, Method};
use reqwest::multipart::{Form, Part};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;

use crate::error::{KeepsakeError, Result};
use crate::gateway::{HttpGateway, MutationOutcome, file_name};
use crate::model::{Photo, PhotoMetadata, Record, Video, VideoMetadata};
use crate::types::RecordId;

const CHUNK_SIZE: usize = 64 * 1024;

/// Largest file accepted before any bytes are sent.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Content type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Queued,
    Sending { sent: u64, total: u64 },
    Done(Option<RecordId>),
    Failed(String),
}

impl UploadState {
    pub fn is_finished(&self) -> bool {
        matches!(self, UploadState::Done(_) | UploadState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub file_name: String,
    pub size: u64,
    pub state: UploadState,
}

impl UploadItem {
    /// Completion in percent; finished items report 100.
    pub fn percent(&self) -> u8 {
        match &self.state {
            UploadState::Queued => 0,
            UploadState::Sending { sent, total } if *total > 0 => {
                u8::try_from(sent.saturating_mul(100) / total).unwrap_or(100)
            }
            UploadState::Sending { .. } => 0,
            UploadState::Done(_) | UploadState::Failed(_) => 100,
        }
    }
}

/// Where a batch goes and what is sent alongside each file.
#[derive(Debug, Clone)]
pub enum UploadTarget {
    Photos(PhotoMetadata),
    Videos(VideoMetadata),
}

impl UploadTarget {
    fn path(&self) -> &'static str {
        match self {
            UploadTarget::Photos(_) => "photos/upload",
            UploadTarget::Videos(_) => "videos/upload",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            UploadTarget::Photos(meta) => meta.form_fields(),
            UploadTarget::Videos(meta) => meta.form_fields(),
        }
    }
}

/// Counts of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
}

pub struct UploadQueue {
    paths: Vec<PathBuf>,
    progress: Arc<watch::Sender<Vec<UploadItem>>>,
}

impl UploadQueue {
    /// Queue `paths`. Files that cannot be read or are too large are marked
    /// failed right away.
    pub async fn new(paths: Vec<PathBuf>) -> Self {
        let mut items = Vec::with_capacity(paths.len());
        for path in &paths {
            let file_name = file_name(path);
            let item = match tokio::fs::metadata(path).await {
                Ok(meta) if !meta.is_file() => UploadItem {
                    file_name,
                    size: 0,
                    state: UploadState::Failed("not a file".to_string()),
                },
                Ok(meta) if meta.len() > MAX_UPLOAD_BYTES => UploadItem {
                    file_name,
                    size: meta.len(),
                    state: UploadState::Failed(format!(
                        "larger than {} MiB",
                        MAX_UPLOAD_BYTES / (1024 * 1024)
                    )),
                },
                Ok(meta) => UploadItem {
                    file_name,
                    size: meta.len(),
                    state: UploadState::Queued,
                },
                Err(e) => UploadItem {
                    file_name,
                    size: 0,
                    state: UploadState::Failed(e.to_string()),
                },
            };
            items.push(item);
        }
        let (progress, _) = watch::channel(items);
        Self {
            paths,
            progress: Arc::new(progress),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<UploadItem>> {
        self.progress.subscribe()
    }

    /// Current progress of every file.
    pub fn snapshot(&self) -> Vec<UploadItem> {
        self.progress.borrow().clone()
    }

    fn set_state(&self, index: usize, state: UploadState) {
        set_state(&self.progress, index, state);
    }

    /// Send every queued file to `target`, in order.
    pub async fn run(&self, gateway: &HttpGateway, target: &UploadTarget) -> UploadSummary {
        let mut summary = UploadSummary::default();
        for (index, path) in self.paths.iter().enumerate() {
            let queued = self
                .progress
                .borrow()
                .get(index)
                .is_some_and(|item| item.state == UploadState::Queued);
            if !queued {
                summary.failed += 1;
                continue;
            }

            match self.send_one(gateway, target, index, path).await {
                Ok(id) => {
                    self.set_state(index, UploadState::Done(id));
                    summary.uploaded += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to upload {}: {e}", path.display());
                    self.set_state(index, UploadState::Failed(e.to_string()));
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    async fn send_one(
        &self,
        gateway: &HttpGateway,
        target: &UploadTarget,
        index: usize,
        path: &Path,
    ) -> Result<Option<RecordId>> {
        let file = File::open(path).await?;
        let total = file.metadata().await?.len();
        self.set_state(index, UploadState::Sending { sent: 0, total });

        let body = progress_body(file, total, index, Arc::clone(&self.progress));
        let part = Part::stream_with_length(body, total)
            .file_name(file_name(path))
            .mime_str(mime_for(path))
            .map_err(|e| KeepsakeError::Other(format!("invalid content type: {e}")))?;

        let mut form = Form::new();
        for (key, value) in target.fields() {
            form = form.text(key, value);
        }
        let builder = gateway
            .request(Method::POST, target.path())?
            .multipart(form.part("file", part));

        Ok(match target {
            UploadTarget::Photos(_) => {
                saved_id(gateway.send_mutation::<Photo>(builder, None).await?)
            }
            UploadTarget::Videos(_) => {
                saved_id(gateway.send_mutation::<Video>(builder, None).await?)
            }
        })
    }
}

fn saved_id<R: Record>(outcome: MutationOutcome<R>) -> Option<RecordId> {
    match outcome {
        MutationOutcome::Saved(record) => Some(record.id().clone()),
        MutationOutcome::Deleted(id) => Some(id),
        MutationOutcome::Accepted(id) => id,
    }
}

fn set_state(progress: &watch::Sender<Vec<UploadItem>>, index: usize, state: UploadState) {
    progress.send_modify(|items| {
        if let Some(item) = items.get_mut(index) {
            item.state = state;
        }
    });
}

/// Request body read from `file` one chunk at a time, reporting each chunk
/// as it is handed to the transport. At most `total` bytes are read.
fn progress_body(
    file: File,
    total: u64,
    index: usize,
    progress: Arc<watch::Sender<Vec<UploadItem>>>,
) -> Body {
    let chunks = stream::try_unfold((file, 0u64), move |(file, sent)| {
        next_chunk(file, sent, total, index, Arc::clone(&progress))
    });
    Body::wrap_stream(chunks)
}

async fn next_chunk(
    mut file: File,
    sent: u64,
    total: u64,
    index: usize,
    progress: Arc<watch::Sender<Vec<UploadItem>>>,
) -> std::io::Result<Option<(Vec<u8>, (File, u64))>> {
    let want = usize::try_from(total - sent).map_or(CHUNK_SIZE, |left| left.min(CHUNK_SIZE));
    if want == 0 {
        return Ok(None);
    }
    let mut chunk = vec![0u8; want];
    let read = file.read(&mut chunk).await?;
    if read == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("file ended after {sent} of {total} bytes"),
        ));
    }
    chunk.truncate(read);
    let sent = sent + read as u64;
    set_state(&progress, index, UploadState::Sending { sent, total });
    Ok(Some((chunk, (file, sent))))
}
