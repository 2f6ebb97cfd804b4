//! Table rows for each listable record.

use tabled::Tabled;

use super::ListView;
use crate::model::{Album, Family, Kid, Milestone, Photo, User, Video};

fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl ListView for User {
    type Row = UserRow;

    fn row(&self) -> UserRow {
        UserRow {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.display_name.clone(),
            role: self.role.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct FamilyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Members")]
    members: String,
}

impl ListView for Family {
    type Row = FamilyRow;

    fn row(&self) -> FamilyRow {
        FamilyRow {
            id: self.id.to_string(),
            name: self.name.clone(),
            members: or_dash(self.member_count),
        }
    }
}

#[derive(Tabled)]
pub struct KidRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Born")]
    born: String,
    #[tabled(rename = "Gender")]
    gender: String,
    #[tabled(rename = "Latest growth")]
    growth: String,
}

impl ListView for Kid {
    type Row = KidRow;

    fn row(&self) -> KidRow {
        let growth = self.latest_growth().map(|entry| {
            let parts: Vec<String> = [
                entry.height_cm.map(|h| format!("{h} cm")),
                entry.weight_kg.map(|w| format!("{w} kg")),
            ]
            .into_iter()
            .flatten()
            .collect();
            format!("{} ({})", parts.join(", "), entry.date)
        });
        KidRow {
            id: self.id.to_string(),
            name: self.name.clone(),
            born: or_dash(self.birth_date),
            gender: or_dash(self.gender),
            growth: or_dash(growth),
        }
    }
}

#[derive(Tabled)]
pub struct AlbumRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Privacy")]
    privacy: String,
    #[tabled(rename = "Photos")]
    photos: String,
    #[tabled(rename = "Shared")]
    shared: String,
}

impl ListView for Album {
    type Row = AlbumRow;

    fn row(&self) -> AlbumRow {
        AlbumRow {
            id: self.id.to_string(),
            title: self.title.clone(),
            privacy: self.privacy.to_string(),
            photos: or_dash(self.photo_count),
            shared: if self.is_shared() { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct PhotoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Caption")]
    caption: String,
    #[tabled(rename = "Taken")]
    taken: String,
    #[tabled(rename = "Likes")]
    likes: String,
    #[tabled(rename = "Views")]
    views: u32,
}

impl ListView for Photo {
    type Row = PhotoRow;

    fn row(&self) -> PhotoRow {
        let likes = if self.liked {
            format!("{} (you)", self.like_count)
        } else {
            self.like_count.to_string()
        };
        PhotoRow {
            id: self.id.to_string(),
            caption: or_dash(self.caption.as_deref().or(self.filename.as_deref())),
            taken: or_dash(self.taken_on()),
            likes,
            views: self.view_count,
        }
    }
}

#[derive(Tabled)]
pub struct VideoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Length")]
    length: String,
    #[tabled(rename = "Recorded")]
    recorded: String,
}

impl ListView for Video {
    type Row = VideoRow;

    fn row(&self) -> VideoRow {
        let length = self.duration_seconds.map(|secs| {
            let secs = secs.round() as u64;
            format!("{}:{:02}", secs / 60, secs % 60)
        });
        VideoRow {
            id: self.id.to_string(),
            title: or_dash(self.title.as_deref()),
            length: or_dash(length),
            recorded: or_dash(self.recorded_on()),
        }
    }
}

#[derive(Tabled)]
pub struct MilestoneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Kid")]
    kid: String,
}

impl ListView for Milestone {
    type Row = MilestoneRow;

    fn row(&self) -> MilestoneRow {
        MilestoneRow {
            id: self.id.to_string(),
            date: self.achieved_on.to_string(),
            title: self.title.clone(),
            category: or_dash(self.category.as_deref()),
            kid: self.kid_id.to_string(),
        }
    }
}
