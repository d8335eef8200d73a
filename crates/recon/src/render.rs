use std::collections::{BTreeSet, HashMap};

use unicode_width::UnicodeWidthStr;

use payload_core::merged_payload_target;

use crate::lookup::AddressBook;
use crate::model::ClassificationResult;

/// Turns one batch's classification results into report text.
pub trait ReportRenderer {
    fn render(&self, file_name: &str, outputs: &[ClassificationResult]) -> String;
}

/// Markdown report with a header block and a fenced grid table.
pub struct GridRenderer<'a> {
    pub commit: String,
    pub book: &'a dyn AddressBook,
}

impl<'a> GridRenderer<'a> {
    pub fn new(commit: impl Into<String>, book: &'a dyn AddressBook) -> Self {
        Self {
            commit: commit.into(),
            book,
        }
    }

    fn merged_payload_line(&self, file_name: &str) -> Option<String> {
        let (chain_id, address) = merged_payload_target(file_name)?;
        let chain = self.book.chain_name(chain_id).unwrap_or_else(|| chain_id.to_string());
        let multisig = self
            .book
            .reverse(&chain, &address)
            .unwrap_or_else(|| "!NOT FOUND".to_string());
        Some(format!(
            "MERGED PAYLOAD: Chain:{chain} ({chain_id}), Multisig: {multisig} ({address})\n"
        ))
    }
}

impl ReportRenderer for GridRenderer<'_> {
    fn render(&self, file_name: &str, outputs: &[ClassificationResult]) -> String {
        let mut report = format!("File name: {file_name}\nCOMMIT: `{}`\n", self.commit);
        if let Some(line) = self.merged_payload_line(file_name) {
            report.push_str(&line);
        }
        let chains: BTreeSet<&str> = outputs.iter().map(|o| o.chain.as_str()).collect();
        let chains: Vec<&str> = chains.into_iter().collect();
        report.push_str(&format!("CHAIN(S): `{}`\n", chains.join(", ")));
        report.push_str("```\n");
        report.push_str(&grid_table(outputs));
        report.push_str("\n```\n");
        report
    }
}

/// Grid table of every result's columns. Headers come from the first result.
pub fn grid_table(outputs: &[ClassificationResult]) -> String {
    let Some(first) = outputs.first() else {
        return String::new();
    };
    let headers: Vec<String> = first.columns().into_iter().map(|(name, _)| name).collect();
    let rows: Vec<Vec<String>> = outputs
        .iter()
        .map(|output| {
            let mut columns: HashMap<String, String> = output.columns().into_iter().collect();
            headers
                .iter()
                .map(|h| columns.remove(h).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| cell_width(h)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_width(cell));
        }
    }

    let mut lines = vec![border(&widths, '-')];
    lines.extend(row_lines(&headers, &widths));
    lines.push(border(&widths, '='));
    for row in &rows {
        lines.extend(row_lines(row, &widths));
        lines.push(border(&widths, '-'));
    }
    lines.join("\n")
}

fn cell_width(cell: &str) -> usize {
    cell.lines().map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&fill.to_string().repeat(width + 2));
        line.push('+');
    }
    line
}

fn row_lines(cells: &[String], widths: &[usize]) -> Vec<String> {
    let split: Vec<Vec<&str>> = cells.iter().map(|c| c.lines().collect()).collect();
    let height = split.iter().map(Vec::len).max().unwrap_or(0).max(1);
    (0..height)
        .map(|i| {
            let mut line = String::from("|");
            for (cell, width) in split.iter().zip(widths) {
                let text = cell.get(i).copied().unwrap_or("");
                line.push(' ');
                line.push_str(&pad_right(text, *width));
                line.push_str(" |");
            }
            line
        })
        .collect()
}

fn pad_right(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(used)))
}
