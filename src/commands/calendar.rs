use serde_json::json;

use super::{CommandOutput, Session};
use crate::calendar::CalendarMonth;
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::gateway::ResourceGateway;
use crate::model::{Milestone, Photo, Record, VideoScope};
use crate::query::QuerySpec;
use crate::types::RecordId;

/// Query for every record matching `filters`, at the largest page size the
/// kind allows so paged kinds need as few requests as possible.
fn spanning_spec<R: Record>(filters: &[(&str, &str)]) -> QuerySpec {
    let page_size = R::KIND
        .allowed_page_sizes()
        .iter()
        .copied()
        .max()
        .unwrap_or_else(|| R::KIND.default_page_size());
    filters.iter().fold(
        QuerySpec::for_kind(R::KIND).with_page_size(page_size),
        |spec, (key, value)| spec.with_filter(*key, *value),
    )
}

/// Month grid of photos, videos and milestones.
///
/// Videos only show up when the calendar is scoped to a kid or an album,
/// since the backend lists them per kid or per album.
pub async fn cmd_calendar(
    month: Option<(i16, i8)>,
    kid: Option<String>,
    album: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let mut calendar = match month {
        Some((year, month)) => CalendarMonth::new(year, month)?,
        None => CalendarMonth::containing(session.today),
    };

    let mut photo_filters = Vec::new();
    if let Some(album) = &album {
        photo_filters.push(("album_id", album.as_str()));
    }
    let photos = session
        .gateway
        .fetch_all::<Photo>(&spanning_spec::<Photo>(&photo_filters))
        .await?;

    let milestone_filters: Vec<(&str, &str)> = kid
        .iter()
        .map(|kid| ("kid_id", kid.as_str()))
        .collect();
    let milestones = session
        .gateway
        .fetch_all::<Milestone>(&spanning_spec::<Milestone>(&milestone_filters))
        .await?;

    let scope = match (&kid, &album) {
        (Some(kid), _) => Some(VideoScope::Kid(RecordId::from(kid.as_str()))),
        (None, Some(album)) => Some(VideoScope::Album(RecordId::from(album.as_str()))),
        (None, None) => None,
    };
    let videos = match &scope {
        Some(scope) => session.gateway.videos_for(scope).await?,
        None => Vec::new(),
    };
    tracing::debug!(
        photos = photos.len(),
        videos = videos.len(),
        milestones = milestones.len(),
        "Loaded calendar events"
    );

    calendar.add_photos(&photos);
    calendar.add_videos(&videos);
    calendar.add_milestones(&milestones);

    let days: Vec<_> = calendar
        .active_days()
        .map(|(date, counts)| {
            json!({
                "date": date.to_string(),
                "photos": counts.photos,
                "videos": counts.videos,
                "milestones": counts.milestones,
            })
        })
        .collect();

    CommandOutput::new(json!({
        "year": calendar.year(),
        "month": calendar.month(),
        "days": days,
    }))
    .with_text(calendar.render())
    .print(output)
}
