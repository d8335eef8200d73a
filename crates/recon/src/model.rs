use serde::ser::{Serialize, SerializeMap, Serializer};

use payload_core::ChainId;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Where a transaction sits: the arguments every classifier receives besides
/// the transaction itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPosition {
    pub chain_id: ChainId,
    pub bip_number: String,
    /// 0-based index in the batch, independent of what other transactions
    /// classified to.
    pub tx_index: usize,
}

/// Structured description of one (batch, index) pair.
///
/// `fields` are the classifier-specific display columns, in order. `chain`,
/// `bip` and `tx_index` are carried by every result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub tx_index: usize,
    pub bip: String,
    pub chain: String,
    pub fields: Vec<(String, String)>,
}

impl ClassificationResult {
    pub fn new(position: &TxPosition, chain: impl Into<String>) -> Self {
        Self {
            tx_index: position.tx_index,
            bip: position.bip_number.clone(),
            chain: chain.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Table columns: the display fields followed by `bip` and `tx_index`.
    pub fn columns(&self) -> Vec<(String, String)> {
        let mut columns = self.fields.clone();
        columns.push(("bip".into(), self.bip.clone()));
        columns.push(("tx_index".into(), self.tx_index.to_string()));
        columns
    }
}

impl Serialize for ClassificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry("chain", &self.chain)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("bip", &self.bip)?;
        map.serialize_entry("tx_index", &self.tx_index)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// One classifier's output for one batch. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ClassifierReport {
    pub classifier: String,
    pub file_name: String,
    pub outputs: Vec<ClassificationResult>,
    pub report_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum_link: Option<String>,
}

/// Every report one classifier produced in a run, keyed by file name and kept
/// in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ReportSet {
    pub classifier: String,
    reports: Vec<ClassifierReport>,
}

impl ReportSet {
    pub fn new(classifier: impl Into<String>) -> Self {
        Self {
            classifier: classifier.into(),
            reports: Vec::new(),
        }
    }

    /// Add a report; a second report for the same file replaces the first.
    pub fn insert(&mut self, report: ClassifierReport) {
        match self.reports.iter_mut().find(|r| r.file_name == report.file_name) {
            Some(existing) => *existing = report,
            None => self.reports.push(report),
        }
    }

    pub fn get(&self, file_name: &str) -> Option<&ClassifierReport> {
        self.reports.iter().find(|r| r.file_name == file_name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassifierReport> {
        self.reports.iter()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().map(|r| r.file_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReportSet {
    type Item = &'a ClassifierReport;
    type IntoIter = std::slice::Iter<'a, ClassifierReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

// ---------------------------------------------------------------------------
// Merged output
// ---------------------------------------------------------------------------

/// Final artifact for one batch: every contributing report, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MergedReport {
    pub file_name: String,
    pub text: String,
    /// Classifier names that contributed, in order.
    pub classifiers: Vec<String>,
    pub outputs: Vec<ClassificationResult>,
}

/// Merged reports in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct MergedReports {
    reports: Vec<MergedReport>,
}

impl MergedReports {
    /// Append one classifier report to its file's entry.
    pub fn append(&mut self, report: &ClassifierReport) {
        let index = match self.reports.iter().position(|m| m.file_name == report.file_name) {
            Some(index) => index,
            None => {
                self.reports.push(MergedReport {
                    file_name: report.file_name.clone(),
                    ..MergedReport::default()
                });
                self.reports.len() - 1
            }
        };
        let merged = &mut self.reports[index];
        merged.text.push_str(&report.report_text);
        merged.classifiers.push(report.classifier.clone());
        merged.outputs.extend(report.outputs.iter().cloned());
    }

    pub fn get(&self, file_name: &str) -> Option<&MergedReport> {
        self.reports.iter().find(|m| m.file_name == file_name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergedReport> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Every report's text, concatenated in order.
    pub fn combined_text(&self) -> String {
        self.reports.iter().map(|m| m.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(tx_index: usize) -> TxPosition {
        TxPosition {
            chain_id: ChainId(1),
            bip_number: "BIP-1".into(),
            tx_index,
        }
    }

    fn report(classifier: &str, file: &str, text: &str) -> ClassifierReport {
        ClassifierReport {
            classifier: classifier.into(),
            file_name: file.into(),
            outputs: vec![ClassificationResult::new(&position(0), "mainnet")],
            report_text: text.into(),
            forum_link: None,
        }
    }

    #[test]
    fn result_serializes_flat() {
        let result = ClassificationResult::new(&position(3), "mainnet")
            .with_field("function", "transfer")
            .with_field("amount", "1.5 (RAW: 1500000)");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"chain":"mainnet","function":"transfer","amount":"1.5 (RAW: 1500000)","bip":"BIP-1","tx_index":3}"#
        );
    }

    #[test]
    fn columns_end_with_provenance() {
        let result = ClassificationResult::new(&position(2), "mainnet").with_field("function", "f");
        let names: Vec<_> = result.columns().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["function", "bip", "tx_index"]);
    }

    #[test]
    fn report_set_keeps_one_entry_per_file() {
        let mut set = ReportSet::new("x");
        set.insert(report("x", "a.json", "first"));
        set.insert(report("x", "b.json", "b"));
        set.insert(report("x", "a.json", "second"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a.json").unwrap().report_text, "second");
        assert_eq!(set.file_names().collect::<Vec<_>>(), vec!["a.json", "b.json"]);
    }

    #[test]
    fn merged_reports_append_in_order() {
        let mut merged = MergedReports::default();
        merged.append(&report("x", "a.json", "X"));
        merged.append(&report("y", "b.json", "Yb"));
        merged.append(&report("y", "a.json", "Y"));
        assert_eq!(merged.len(), 2);
        let a = merged.get("a.json").unwrap();
        assert_eq!(a.text, "XY");
        assert_eq!(a.classifiers, vec!["x", "y"]);
        assert_eq!(a.outputs.len(), 2);
        assert_eq!(merged.combined_text(), "XYYb");
    }
}
