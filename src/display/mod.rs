//! Terminal rendering of lists, banners and upload progress.
//!
//! Colors are only emitted when stdout supports them, so piped output and
//! test captures stay plain.

pub mod rows;

use owo_colors::{OwoColorize, Stream};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::controller::{Banner, ListController};
use crate::error::{ErrorKind, FieldErrors};
use crate::locale::I18n;
use crate::model::Record;
use crate::upload::{UploadItem, UploadState};

/// A record that can be shown as a table row.
pub trait ListView: Record {
    type Row: Tabled;

    fn row(&self) -> Self::Row;
}

pub fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.cyan())
        .to_string()
}

pub fn dimmed(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.dimmed())
        .to_string()
}

pub fn success(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.green())
        .to_string()
}

/// Table of the visible rows followed by a pagination footer.
pub fn render_list<R: ListView>(list: &ListController<R>, i18n: &I18n) -> String {
    let visible = list.visible_items();
    let mut out = String::new();

    if visible.is_empty() {
        let key = if list.page().items().is_empty() {
            "list.empty"
        } else {
            "list.no_matches"
        };
        out.push_str(&dimmed(i18n.t(key)));
    } else {
        let mut table = Table::new(visible.iter().map(|record| record.row()));
        table.with(Style::rounded());
        out.push_str(&table.to_string());
    }

    let total_key = match list.known_total() {
        Some(_) => "list.total",
        None => "list.total_at_least",
    };
    let footer = format!(
        "{} ({})",
        i18n.page_label(list.query().page(), list.query().page_count()),
        i18n.format(total_key, &[("count", &list.total_count())])
    );
    out.push('\n');
    out.push_str(&dimmed(&footer));
    out
}

/// One-line banner text with a localized title.
pub fn banner_line(banner: &Banner, i18n: &I18n) -> String {
    let title = match banner.kind {
        ErrorKind::Auth => i18n.t("banner.auth"),
        ErrorKind::Network => i18n.t("banner.network"),
        ErrorKind::NotFound => i18n.t("banner.not_found"),
        ErrorKind::Server | ErrorKind::Validation | ErrorKind::Client => i18n.t("banner.server"),
    };
    format!("{title}: {}", banner.message)
}

pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `name  42%  sending` style progress line.
pub fn format_upload_item(item: &UploadItem, i18n: &I18n) -> String {
    let state = match &item.state {
        UploadState::Queued => dimmed("queued"),
        UploadState::Sending { .. } => "sending".to_string(),
        UploadState::Done(_) => success(i18n.t("upload.done")),
        UploadState::Failed(reason) => format!(
            "{}: {reason}",
            i18n.t("upload.failed")
                .if_supports_color(Stream::Stdout, |t| t.red())
        ),
    };
    format!("{:<32} {:>3}%  {state}", item.file_name, item.percent())
}
