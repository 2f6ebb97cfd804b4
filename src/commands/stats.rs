use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, Session};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::model::AdminStats;

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Resource")]
    resource: &'static str,
    #[tabled(rename = "Total")]
    total: u64,
}

fn stats_table(stats: &AdminStats) -> String {
    let rows = stats
        .rows()
        .into_iter()
        .map(|(resource, total)| StatRow { resource, total });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Admin dashboard totals
pub async fn cmd_stats(output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    let stats = session.gateway.stats().await?;
    CommandOutput::new(json!({ "stats": stats }))
        .with_text(stats_table(&stats))
        .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table_lists_every_resource() {
        let stats = AdminStats {
            total_users: 12,
            total_photos: 340,
            ..AdminStats::default()
        };
        let table = stats_table(&stats);
        for resource in ["users", "families", "kids", "albums", "photos", "videos"] {
            assert!(table.contains(resource), "missing {resource}");
        }
        assert!(table.contains("340"));
    }
}
