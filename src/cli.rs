use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jiff::civil::Date;

use crate::commands::{
    ListOptions, cmd_albums_create, cmd_albums_edit, cmd_albums_ls, cmd_albums_share,
    cmd_albums_unshare, cmd_calendar, cmd_config_get, cmd_config_set, cmd_config_show,
    cmd_families_create, cmd_families_invite, cmd_families_ls, cmd_kids_add, cmd_kids_avatar,
    cmd_kids_edit, cmd_kids_growth, cmd_kids_ls, cmd_milestones_add, cmd_milestones_edit,
    cmd_milestones_ls, cmd_milestones_rm, cmd_photos_like, cmd_photos_ls, cmd_photos_upload,
    cmd_photos_view, cmd_stats, cmd_users_lookup, cmd_users_ls, cmd_users_rm, cmd_users_role,
    cmd_videos_ls, cmd_videos_rm, cmd_videos_upload,
};
use crate::config::CONFIG_KEYS;
use crate::model::{FamilyRole, Gender, Privacy, Role};
use crate::query::SortSpec;

#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Family photo, video and milestone keeping")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a command prints its result.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

/// Paging, sorting and search flags shared by every `ls` command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (allowed sizes depend on the resource)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Narrow the loaded page to rows containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort field; prefix with '-' for descending (e.g. -created_at)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_sort)]
    pub sort: Option<SortSpec>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn options(self) -> ListOptions {
        ListOptions {
            page: self.page.saturating_sub(1),
            page_size: self.page_size,
            search: self.search,
            sort: self.sort,
            filters: Vec::new(),
            output: OutputOptions::new(self.json),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage accounts (admin)
    #[command(visible_alias = "u")]
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage families
    #[command(visible_alias = "f")]
    Families {
        #[command(subcommand)]
        action: FamilyAction,
    },

    /// Manage kids and their growth records
    #[command(visible_alias = "k")]
    Kids {
        #[command(subcommand)]
        action: KidAction,
    },

    /// Manage photo albums
    #[command(visible_alias = "a")]
    Albums {
        #[command(subcommand)]
        action: AlbumAction,
    },

    /// Browse and upload photos
    #[command(visible_alias = "p")]
    Photos {
        #[command(subcommand)]
        action: PhotoAction,
    },

    /// Browse and upload videos
    #[command(visible_alias = "v")]
    Videos {
        #[command(subcommand)]
        action: VideoAction,
    },

    /// Manage developmental milestones
    #[command(visible_alias = "m")]
    Milestones {
        #[command(subcommand)]
        action: MilestoneAction,
    },

    /// Show admin dashboard totals
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show photos, videos and milestones per day of a month
    Calendar {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<(i16, i8)>,

        /// Only videos and milestones of this kid
        #[arg(long)]
        kid: Option<String>,

        /// Only photos of this album
        #[arg(long)]
        album: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List accounts
    Ls(ListArgs),
    /// Change the role of an account
    Role {
        /// Account ID
        id: String,
        /// New role (admin, family_member)
        #[arg(value_parser = parse_role)]
        role: Role,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an account
    Rm {
        /// Account ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find accounts by name or email
    Lookup {
        /// Text to search for (at least 2 characters)
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum FamilyAction {
    /// List families (admin)
    Ls(ListArgs),
    /// Create a family
    Create {
        /// Family name
        name: String,
        /// Description text
        #[arg(short, long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Invite an existing account into a family
    Invite {
        /// Family ID
        family: String,
        /// Name or email of the account to invite
        #[arg(long)]
        user: String,
        /// How the account relates to the kids (e.g. grandmother)
        #[arg(long)]
        relationship: String,
        /// Role inside the family (admin, member, viewer; default: member)
        #[arg(long, default_value = "member", value_parser = parse_family_role)]
        role: FamilyRole,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum KidAction {
    /// List kids
    Ls(ListArgs),
    /// Add a kid
    Add {
        /// Kid name
        name: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        born: Option<Date>,
        /// Gender (male, female, other)
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a kid
    Edit {
        /// Kid ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Birth date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        born: Option<Date>,
        /// Gender (male, female, other)
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a height and/or weight measurement
    Growth {
        /// Kid ID
        id: String,
        /// Measurement date (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a profile picture
    Avatar {
        /// Kid ID
        id: String,
        /// Image file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AlbumAction {
    /// List albums
    Ls(ListArgs),
    /// Create an album
    Create {
        /// Album title
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Who can see it (private, family, public; default: private)
        #[arg(long, value_parser = parse_privacy)]
        privacy: Option<Privacy>,
        /// Kid the album is about
        #[arg(long)]
        kid: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an album
    Edit {
        /// Album ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_privacy)]
        privacy: Option<Privacy>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Publish an album behind a share link
    Share {
        /// Album ID
        id: String,
        /// Password required to open the link (at least 4 characters)
        #[arg(long)]
        password: Option<String>,
        /// Days until the link expires (1-365)
        #[arg(long)]
        expires_in_days: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Revoke the share link of an album
    Unshare {
        /// Album ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PhotoAction {
    /// List photos
    Ls {
        /// Only photos of this album
        #[arg(long)]
        album: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Upload photo files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        kid: Option<String>,
        /// Capture date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        taken: Option<Date>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Like a photo
    Like {
        /// Photo ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a like from a photo
    Unlike {
        /// Photo ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count a view of a photo
    View {
        /// Photo ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum VideoAction {
    /// List the videos of a kid or an album
    Ls {
        #[arg(long, required_unless_present = "album", conflicts_with = "album")]
        kid: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Upload video files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        kid: Option<String>,
        #[arg(long)]
        album: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a video
    Rm {
        /// Video ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum MilestoneAction {
    /// List milestones
    Ls {
        /// Only milestones of this kid
        #[arg(long)]
        kid: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Record a milestone
    Add {
        /// Kid ID
        kid: String,
        /// What happened
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Category (e.g. motor, language)
        #[arg(long)]
        category: Option<String>,
        /// Date achieved (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_date)]
        on: Option<Date>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a milestone
    Edit {
        /// Milestone ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_date)]
        on: Option<Date>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a milestone
    Rm {
        /// Milestone ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.base_url, api.timeout, auth.token, media.base_url,
        /// search.debounce_ms, locale)
        #[arg(value_parser = parse_config_key)]
        key: String,
        /// Value to set (empty clears optional keys)
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_parser = parse_config_key)]
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Users { action } => match action {
                UserAction::Ls(list) => cmd_users_ls(list.options()).await,
                UserAction::Role { id, role, json } => {
                    cmd_users_role(&id, role, OutputOptions::new(json)).await
                }
                UserAction::Rm { id, json } => cmd_users_rm(&id, OutputOptions::new(json)).await,
                UserAction::Lookup { text, json } => {
                    cmd_users_lookup(&text, OutputOptions::new(json)).await
                }
            },

            Commands::Families { action } => match action {
                FamilyAction::Ls(list) => cmd_families_ls(list.options()).await,
                FamilyAction::Create {
                    name,
                    description,
                    json,
                } => cmd_families_create(name, description, OutputOptions::new(json)).await,
                FamilyAction::Invite {
                    family,
                    user,
                    relationship,
                    role,
                    json,
                } => {
                    cmd_families_invite(
                        &family,
                        &user,
                        relationship,
                        role,
                        OutputOptions::new(json),
                    )
                    .await
                }
            },

            Commands::Kids { action } => match action {
                KidAction::Ls(list) => cmd_kids_ls(list.options()).await,
                KidAction::Add {
                    name,
                    born,
                    gender,
                    json,
                } => cmd_kids_add(name, born, gender, OutputOptions::new(json)).await,
                KidAction::Edit {
                    id,
                    name,
                    born,
                    gender,
                    json,
                } => cmd_kids_edit(&id, name, born, gender, OutputOptions::new(json)).await,
                KidAction::Growth {
                    id,
                    date,
                    height,
                    weight,
                    json,
                } => cmd_kids_growth(&id, date, height, weight, OutputOptions::new(json)).await,
                KidAction::Avatar { id, file, json } => {
                    cmd_kids_avatar(&id, &file, OutputOptions::new(json)).await
                }
            },

            Commands::Albums { action } => match action {
                AlbumAction::Ls(list) => cmd_albums_ls(list.options()).await,
                AlbumAction::Create {
                    title,
                    description,
                    privacy,
                    kid,
                    json,
                } => {
                    cmd_albums_create(title, description, privacy, kid, OutputOptions::new(json))
                        .await
                }
                AlbumAction::Edit {
                    id,
                    title,
                    description,
                    privacy,
                    json,
                } => {
                    cmd_albums_edit(&id, title, description, privacy, OutputOptions::new(json))
                        .await
                }
                AlbumAction::Share {
                    id,
                    password,
                    expires_in_days,
                    json,
                } => {
                    cmd_albums_share(&id, password, expires_in_days, OutputOptions::new(json))
                        .await
                }
                AlbumAction::Unshare { id, json } => {
                    cmd_albums_unshare(&id, OutputOptions::new(json)).await
                }
            },

            Commands::Photos { action } => match action {
                PhotoAction::Ls { album, list } => {
                    let mut options = list.options();
                    options.filters.extend(album.map(|id| ("album_id", id)));
                    cmd_photos_ls(options).await
                }
                PhotoAction::Upload {
                    files,
                    album,
                    caption,
                    kid,
                    taken,
                    json,
                } => {
                    let metadata = crate::model::PhotoMetadata {
                        album_id: album.map(Into::into),
                        caption,
                        kid_id: kid.map(Into::into),
                        taken_at: taken,
                    };
                    cmd_photos_upload(files, metadata, OutputOptions::new(json)).await
                }
                PhotoAction::Like { id, json } => {
                    cmd_photos_like(&id, true, OutputOptions::new(json)).await
                }
                PhotoAction::Unlike { id, json } => {
                    cmd_photos_like(&id, false, OutputOptions::new(json)).await
                }
                PhotoAction::View { id, json } => {
                    cmd_photos_view(&id, OutputOptions::new(json)).await
                }
            },

            Commands::Videos { action } => match action {
                VideoAction::Ls { kid, album, list } => {
                    let mut options = list.options();
                    options.filters.extend(kid.map(|id| ("kid_id", id)));
                    options.filters.extend(album.map(|id| ("album_id", id)));
                    cmd_videos_ls(options).await
                }
                VideoAction::Upload {
                    files,
                    title,
                    kid,
                    album,
                    json,
                } => {
                    let metadata = crate::model::VideoMetadata {
                        title,
                        kid_id: kid.map(Into::into),
                        album_id: album.map(Into::into),
                    };
                    cmd_videos_upload(files, metadata, OutputOptions::new(json)).await
                }
                VideoAction::Rm { id, json } => cmd_videos_rm(&id, OutputOptions::new(json)).await,
            },

            Commands::Milestones { action } => match action {
                MilestoneAction::Ls { kid, list } => {
                    let mut options = list.options();
                    options.filters.extend(kid.map(|id| ("kid_id", id)));
                    cmd_milestones_ls(options).await
                }
                MilestoneAction::Add {
                    kid,
                    title,
                    description,
                    category,
                    on,
                    json,
                } => {
                    cmd_milestones_add(
                        kid,
                        title,
                        description,
                        category,
                        on,
                        OutputOptions::new(json),
                    )
                    .await
                }
                MilestoneAction::Edit {
                    id,
                    title,
                    description,
                    category,
                    on,
                    json,
                } => {
                    cmd_milestones_edit(
                        &id,
                        title,
                        description,
                        category,
                        on,
                        OutputOptions::new(json),
                    )
                    .await
                }
                MilestoneAction::Rm { id, json } => {
                    cmd_milestones_rm(&id, OutputOptions::new(json)).await
                }
            },

            Commands::Stats { json } => cmd_stats(OutputOptions::new(json)).await,

            Commands::Calendar {
                month,
                kid,
                album,
                json,
            } => cmd_calendar(month, kid, album, OutputOptions::new(json)).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => {
                    cmd_config_get(&key, OutputOptions::new(json))
                }
            },
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_role(s: &str) -> Result<Role, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "role",
        &["admin", "family_member"],
    )
}

fn parse_family_role(s: &str) -> Result<FamilyRole, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "family role",
        &["admin", "member", "viewer"],
    )
}

fn parse_privacy(s: &str) -> Result<Privacy, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "privacy",
        &["private", "family", "public"],
    )
}

fn parse_gender(s: &str) -> Result<Gender, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "gender",
        &["male", "female", "other"],
    )
}

fn parse_config_key(s: &str) -> Result<String, String> {
    parse_with_validation(
        s,
        |v| {
            if CONFIG_KEYS.contains(&v) {
                Ok(v.to_string())
            } else {
                Err(String::new())
            }
        },
        "config key",
        CONFIG_KEYS,
    )
}

fn parse_date(s: &str) -> Result<Date, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("Invalid date '{s}'. Use YYYY-MM-DD"))
}

fn parse_sort(s: &str) -> Result<SortSpec, String> {
    s.parse().map_err(|e: crate::error::KeepsakeError| e.to_string())
}

fn parse_month(s: &str) -> Result<(i16, i8), String> {
    let invalid = || format!("Invalid month '{s}'. Use YYYY-MM");
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i16 = year.parse().map_err(|_| invalid())?;
    let month: i8 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
