//! Command implementations behind the `keepsake` binary.
//!
//! List commands drive a [`ListController`] exactly as a view would: build
//! the query, load it, then render the visible rows. Create and edit commands
//! go through a [`FormController`] so the same validation runs before any
//! request is made.

mod albums;
mod calendar;
mod config;
mod families;
mod kids;
mod milestones;
mod photos;
mod stats;
mod users;
mod videos;

pub use albums::{
    cmd_albums_create, cmd_albums_edit, cmd_albums_ls, cmd_albums_share, cmd_albums_unshare,
};
pub use calendar::cmd_calendar;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use families::{cmd_families_create, cmd_families_invite, cmd_families_ls};
pub use kids::{cmd_kids_add, cmd_kids_avatar, cmd_kids_edit, cmd_kids_growth, cmd_kids_ls};
pub use milestones::{
    cmd_milestones_add, cmd_milestones_edit, cmd_milestones_ls, cmd_milestones_rm,
};
pub use photos::{cmd_photos_like, cmd_photos_ls, cmd_photos_upload, cmd_photos_view};
pub use stats::cmd_stats;
pub use users::{cmd_users_lookup, cmd_users_ls, cmd_users_rm, cmd_users_role};
pub use videos::{cmd_videos_ls, cmd_videos_rm, cmd_videos_upload};

use std::path::PathBuf;

use jiff::civil::Date;
use serde_json::{Value, json};

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::controller::{FetchCommit, ListController};
use crate::display::{ListView, banner_line, format_upload_item, render_list};
use crate::error::{KeepsakeError, Result};
use crate::form::{FormController, FormModel};
use crate::gateway::{HttpGateway, MutationIntent, MutationOutcome, ResourceGateway};
use crate::locale::I18n;
use crate::model::Record;
use crate::query::{QueryState, SortSpec};
use crate::types::RecordId;
use crate::upload::{UploadItem, UploadQueue, UploadState, UploadTarget};

/// Everything a command needs to talk to the backend.
pub struct Session {
    pub config: Config,
    pub gateway: HttpGateway,
    pub i18n: I18n,
    pub today: Date,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let gateway = HttpGateway::from_config(&config)?;
        let i18n = I18n::new(config.locale());
        Ok(Self {
            config,
            gateway,
            i18n,
            today: jiff::Zoned::now().date(),
        })
    }
}

/// Result of a command, printable as JSON or text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            return print_json(&self.json);
        }
        match self.text {
            Some(text) => println!("{text}"),
            None => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Query flags of an `ls` command. `page` is zero-based.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub page: u32,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<SortSpec>,
    pub filters: Vec<(&'static str, String)>,
    pub output: OutputOptions,
}

impl ListOptions {
    pub fn query(&self, kind: crate::types::ResourceKind) -> Result<QueryState> {
        let mut query = QueryState::new(kind);
        if let Some(size) = self.page_size {
            query.set_page_size(size)?;
        }
        query.set_sort(self.sort.clone());
        for (key, value) in &self.filters {
            query.set_filter(key, Some(value.clone()));
        }
        query.set_page(self.page);
        if let Some(text) = &self.search {
            query.set_search(text.clone());
        }
        Ok(query)
    }
}

/// Load one page through a list controller.
pub async fn load_list<R, G>(
    gateway: &G,
    options: &ListOptions,
    i18n: &I18n,
) -> Result<ListController<R>>
where
    R: Record,
    G: ResourceGateway,
{
    let mut list = ListController::with_query(options.query(R::KIND)?);
    if matches!(list.load(gateway).await, FetchCommit::Failed) {
        let message = list
            .banner()
            .map(|banner| banner_line(banner, i18n))
            .unwrap_or_else(|| format!("failed to load {}", R::KIND));
        return Err(KeepsakeError::Other(message));
    }
    Ok(list)
}

pub(crate) async fn list_command<R: ListView>(options: ListOptions) -> Result<()> {
    let session = Session::open()?;
    let list = load_list::<R, _>(&session.gateway, &options, &session.i18n).await?;
    print_list(&list, &session.i18n, options.output)
}

pub(crate) fn print_list<R: ListView>(
    list: &ListController<R>,
    i18n: &I18n,
    output: OutputOptions,
) -> Result<()> {
    let query = list.query();
    CommandOutput::new(json!({
        "kind": R::KIND.to_string(),
        "page": query.page() + 1,
        "page_size": query.page_size(),
        "page_count": query.page_count(),
        "total_count": list.known_total(),
        "search": query.search_text(),
        "items": list.visible_items(),
    }))
    .with_text(render_list(list, i18n))
    .print(output)
}

/// Validate and send an open form.
///
/// `Ok(None)` means an edit that changed nothing. Backend errors are recorded
/// on the form first, so field errors come back merged with local ones.
pub(crate) async fn submit_form<F: FormModel>(
    session: &Session,
    form: &mut FormController<F>,
) -> Result<Option<MutationOutcome<F::Record>>> {
    let sent = form.send(&session.gateway, session.today).await?;
    Ok(sent.map(|(_, outcome)| outcome))
}

/// Text and JSON for a mutation result.
pub(crate) fn mutation_output<R: Record>(
    verb: &str,
    outcome: Option<MutationOutcome<R>>,
    i18n: &I18n,
) -> Result<CommandOutput> {
    let kind = R::KIND.singular();
    Ok(match outcome {
        None => CommandOutput::new(json!({ "action": "unchanged" }))
            .with_text(i18n.t("form.unchanged")),
        Some(MutationOutcome::Saved(record)) => {
            let text = format!("{} {kind} {}", capitalize(verb), record.id());
            CommandOutput::new(json!({ "action": verb, "record": serde_json::to_value(&record)? }))
                .with_text(text)
        }
        Some(MutationOutcome::Deleted(id)) => {
            CommandOutput::new(json!({ "action": "deleted", "id": id.as_str() }))
                .with_text(format!("Deleted {kind} {id}"))
        }
        Some(MutationOutcome::Accepted(id)) => {
            let text = match &id {
                Some(id) => format!("{} {kind} {id}", capitalize(verb)),
                None => format!("{} {kind}", capitalize(verb)),
            };
            CommandOutput::new(json!({ "action": verb, "id": id.as_ref().map(RecordId::as_str) }))
                .with_text(text)
        }
    })
}

/// Delete a record by id.
pub(crate) async fn delete_command<R: Record>(id: &str, output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    let outcome = session
        .gateway
        .mutate::<R>(MutationIntent::Delete(RecordId::from(id)))
        .await?;
    mutation_output::<R>("deleted", Some(outcome), &session.i18n)?.print(output)
}

/// Upload `files` one after another, reporting each file on stderr as it
/// finishes. Fails when any file did not make it.
pub(crate) async fn upload_command(
    files: Vec<PathBuf>,
    target: UploadTarget,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let queue = UploadQueue::new(files).await;
    let mut progress = queue.subscribe();
    let mut reported = vec![false; queue.snapshot().len()];

    let run = queue.run(&session.gateway, &target);
    tokio::pin!(run);
    let summary = loop {
        tokio::select! {
            summary = &mut run => break summary,
            changed = progress.changed() => {
                if changed.is_err() {
                    break (&mut run).await;
                }
                let items = progress.borrow_and_update().clone();
                if !output.json {
                    report_finished(&items, &mut reported, &session.i18n);
                }
            }
        }
    };

    let items = queue.snapshot();
    if !output.json {
        report_finished(&items, &mut reported, &session.i18n);
    }

    let files: Vec<Value> = items
        .iter()
        .map(|item| {
            let (state, id, error) = match &item.state {
                UploadState::Done(id) => ("done", id.as_ref().map(RecordId::as_str), None),
                UploadState::Failed(reason) => ("failed", None, Some(reason.as_str())),
                UploadState::Queued | UploadState::Sending { .. } => ("queued", None, None),
            };
            json!({
                "file": item.file_name,
                "size": item.size,
                "state": state,
                "id": id,
                "error": error,
            })
        })
        .collect();
    CommandOutput::new(json!({
        "uploaded": summary.uploaded,
        "failed": summary.failed,
        "files": files,
    }))
    .with_text(format!(
        "{} uploaded, {} failed",
        summary.uploaded, summary.failed
    ))
    .print(output)?;

    if summary.failed > 0 {
        return Err(KeepsakeError::Other(format!(
            "{} of {} uploads failed",
            summary.failed,
            items.len()
        )));
    }
    Ok(())
}

fn report_finished(items: &[UploadItem], reported: &mut [bool], i18n: &I18n) {
    for (item, seen) in items.iter().zip(reported.iter_mut()) {
        if item.state.is_finished() && !*seen {
            *seen = true;
            eprintln!("{}", format_upload_item(item, i18n));
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
