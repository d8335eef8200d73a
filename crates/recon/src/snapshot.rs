//! Snapshot vote options for newly added gauges.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use payload_config::SnapshotConfig;

use crate::model::ReportSet;

/// Field whose first line is the pool symbol.
pub const SYMBOL_FIELD: &str = "symbol_and_info";

/// Snapshot caps choice labels at 32 characters.
pub const MAX_OPTION_CHARS: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotOptions {
    pub options: Vec<String>,
    pub markdown: String,
}

impl SnapshotOptions {
    /// Weekly snapshot file body: markdown, a gap, then the options as JSON.
    pub fn file_contents(&self) -> String {
        let json = serde_json::to_string_pretty(&self.options).unwrap_or_else(|_| "[]".to_string());
        format!("{}\n\n\n\n\n{json}", self.markdown)
    }
}

/// `prefix + symbol`, cut to [`MAX_OPTION_CHARS`] characters.
pub fn option_string(prefix: &str, symbol: &str) -> String {
    prefix.chars().chain(symbol.chars()).take(MAX_OPTION_CHARS).collect()
}

/// One option per gauge-add result, in report order.
pub fn derive_snapshot_options(gauge_adds: &ReportSet, config: &SnapshotConfig) -> SnapshotOptions {
    let mut derived = SnapshotOptions {
        options: Vec::new(),
        markdown: config.md_prefix.clone(),
    };
    for report in gauge_adds {
        for output in &report.outputs {
            let Some(symbol) = output.field(SYMBOL_FIELD).and_then(|info| info.lines().next()) else {
                log::warn!("{}: no symbol found to add to snapshot list", report.file_name);
                continue;
            };
            let option = option_string(&config.option_prefix, symbol);
            match &report.forum_link {
                Some(link) => derived.markdown.push_str(&format!("[{option}]({link})\n")),
                None => derived.markdown.push_str(&format!("{option}\n")),
            }
            derived.options.push(option);
        }
    }
    derived
}

/// `2024-W07-snapshot-info.txt` for any day of ISO week 7 of 2024.
pub fn week_file_name(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}-snapshot-info.txt", week.year(), week.week())
}
