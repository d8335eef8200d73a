// Report output files

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use payload_recon::{week_file_name, MergedReports, SnapshotOptions};

use crate::error::WriteError;

/// `<root>/<file_name>` with `.json` replaced by `.report.txt`.
pub fn report_path(root: &Path, file_name: &str) -> PathBuf {
    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    root.join(format!("{stem}.report.txt"))
}

fn write_file(path: &Path, contents: &str) -> Result<(), WriteError> {
    let wrap = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, contents).map_err(wrap)
}

/// One report file per merged batch, next to its payload. Returns the paths
/// written, in report order.
pub fn write_batch_reports(root: &Path, merged: &MergedReports) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(merged.len());
    for report in merged.iter() {
        let path = report_path(root, &report.file_name);
        write_file(&path, &report.text)?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Every batch report concatenated into one file.
pub fn write_combined_report(path: &Path, merged: &MergedReports) -> Result<(), WriteError> {
    write_file(path, &merged.combined_text())
}

/// Weekly snapshot file under `dir`, named after the ISO week of `date`.
pub fn write_snapshot(dir: &Path, date: NaiveDate, options: &SnapshotOptions) -> Result<PathBuf, WriteError> {
    let path = dir.join(week_file_name(date));
    write_file(&path, &options.file_contents())?;
    Ok(path)
}
