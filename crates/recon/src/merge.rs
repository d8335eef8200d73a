use crate::model::{MergedReports, ReportSet};

/// Concatenate every report set's text per file, in the order given.
///
/// Files appear in order of first appearance. A file no set mentions is
/// absent from the result.
pub fn merge<'a>(report_sets: impl IntoIterator<Item = &'a ReportSet>) -> MergedReports {
    let mut merged = MergedReports::default();
    for set in report_sets {
        for report in set {
            merged.append(report);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassifierReport;

    fn set(classifier: &str, files: &[(&str, &str)]) -> ReportSet {
        let mut set = ReportSet::new(classifier);
        for (file_name, text) in files {
            set.insert(ClassifierReport {
                classifier: classifier.into(),
                file_name: file_name.to_string(),
                outputs: Vec::new(),
                report_text: text.to_string(),
                forum_link: None,
            });
        }
        set
    }

    #[test]
    fn concatenates_in_sequence_order() {
        let sets = [
            set("x", &[("file1.json", "report1"), ("file2.json", "report2")]),
            set("y", &[("file1.json", "report3"), ("file3.json", "report4")]),
        ];
        let merged = merge(&sets);
        let files: Vec<_> = merged.iter().map(|m| m.file_name.as_str()).collect();
        assert_eq!(files, vec!["file1.json", "file2.json", "file3.json"]);
        assert_eq!(merged.get("file1.json").unwrap().text, "report1report3");
        assert_eq!(merged.get("file2.json").unwrap().text, "report2");
        assert_eq!(merged.get("file3.json").unwrap().text, "report4");
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(merge(&[ReportSet::new("x")]).is_empty());
    }
}
