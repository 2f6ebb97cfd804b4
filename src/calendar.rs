//! Month view aggregating photos, videos and milestones per day.

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::error::{KeepsakeError, Result};
use crate::model::{Milestone, Photo, Video};

/// Events recorded on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayCounts {
    pub photos: u32,
    pub videos: u32,
    pub milestones: u32,
}

impl DayCounts {
    pub fn total(&self) -> u32 {
        self.photos + self.videos + self.milestones
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn describe(&self) -> String {
        [
            (self.photos, "photo"),
            (self.videos, "video"),
            (self.milestones, "milestone"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, noun)| {
            if n == 1 {
                format!("1 {noun}")
            } else {
                format!("{n} {noun}s")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// One calendar month with weeks starting on Monday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    first: Date,
    days: BTreeMap<i8, DayCounts>,
}

impl CalendarMonth {
    pub fn new(year: i16, month: i8) -> Result<Self> {
        let first = Date::new(year, month, 1)
            .map_err(|e| KeepsakeError::Other(format!("invalid month {year}-{month}: {e}")))?;
        Ok(Self::containing(first))
    }

    /// The month `date` falls in.
    pub fn containing(date: Date) -> Self {
        Self {
            first: date.first_of_month(),
            days: BTreeMap::new(),
        }
    }

    pub fn year(&self) -> i16 {
        self.first.year()
    }

    pub fn month(&self) -> i8 {
        self.first.month()
    }

    pub fn previous(&self) -> Result<Self> {
        let day = self.first.yesterday().map_err(out_of_range)?;
        Ok(Self::containing(day))
    }

    pub fn next(&self) -> Result<Self> {
        let day = self.first.last_of_month().tomorrow().map_err(out_of_range)?;
        Ok(Self::containing(day))
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    fn bump(&mut self, day: Option<Date>, add: impl FnOnce(&mut DayCounts)) {
        if let Some(day) = day.filter(|d| self.contains(*d)) {
            add(self.days.entry(day.day()).or_default());
        }
    }

    /// Count photos by capture day. Photos outside the month are ignored.
    pub fn add_photos(&mut self, photos: &[Photo]) {
        for photo in photos {
            self.bump(photo.taken_on(), |c| c.photos += 1);
        }
    }

    pub fn add_videos(&mut self, videos: &[Video]) {
        for video in videos {
            self.bump(video.recorded_on(), |c| c.videos += 1);
        }
    }

    pub fn add_milestones(&mut self, milestones: &[Milestone]) {
        for milestone in milestones {
            self.bump(Some(milestone.achieved_on), |c| c.milestones += 1);
        }
    }

    pub fn counts(&self, day: i8) -> DayCounts {
        self.days.get(&day).copied().unwrap_or_default()
    }

    /// Days with at least one event, in order.
    pub fn active_days(&self) -> impl Iterator<Item = (Date, DayCounts)> + '_ {
        self.days
            .iter()
            .filter(|(_, counts)| !counts.is_empty())
            .filter_map(|(day, counts)| {
                let date = Date::new(self.year(), self.month(), *day).ok()?;
                Some((date, *counts))
            })
    }

    /// Day numbers laid out in Monday-first weeks.
    pub fn weeks(&self) -> Vec<[Option<i8>; 7]> {
        let lead = self.first.weekday().to_monday_zero_offset();
        let mut cells: Vec<Option<i8>> = vec![None; lead as usize];
        cells.extend((1..=self.first.days_in_month()).map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells
            .chunks(7)
            .map(|week| {
                let mut row = [None; 7];
                row.copy_from_slice(week);
                row
            })
            .collect()
    }

    /// Plain-text month grid. Days with events carry a `*`, and a per-day
    /// breakdown follows the grid.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.first.strftime("%B %Y"));
        out.push_str("Mo  Tu  We  Th  Fr  Sa  Su\n");
        for week in self.weeks() {
            let mut line = String::new();
            for cell in week {
                match cell {
                    Some(day) => {
                        let marker = if self.counts(day).is_empty() { ' ' } else { '*' };
                        line.push_str(&format!("{day:>2}{marker} "));
                    }
                    None => line.push_str("    "),
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        let details: Vec<String> = self
            .active_days()
            .map(|(date, counts)| {
                format!(
                    "{} {:>2}  {}",
                    date.strftime("%b"),
                    date.day(),
                    counts.describe()
                )
            })
            .collect();
        if !details.is_empty() {
            out.push('\n');
            out.push_str(&details.join("\n"));
        }
        out.trim_end().to_string()
    }
}

fn out_of_range(e: jiff::Error) -> KeepsakeError {
    KeepsakeError::Other(format!("date out of range: {e}"))
}
