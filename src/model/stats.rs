use serde::{Deserialize, Serialize};

/// Totals shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    #[serde(alias = "users")]
    pub total_users: u64,
    #[serde(alias = "families")]
    pub total_families: u64,
    #[serde(alias = "kids")]
    pub total_kids: u64,
    #[serde(alias = "albums")]
    pub total_albums: u64,
    #[serde(alias = "photos")]
    pub total_photos: u64,
    #[serde(alias = "videos")]
    pub total_videos: u64,
}

impl AdminStats {
    pub fn rows(&self) -> [(&'static str, u64); 6] {
        [
            ("users", self.total_users),
            ("families", self.total_families),
            ("kids", self.total_kids),
            ("albums", self.total_albums),
            ("photos", self.total_photos),
            ("videos", self.total_videos),
        ]
    }
}
