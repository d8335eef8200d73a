//! Coverage reconciliation: which transactions no classifier claimed.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

use payload_core::{bip_from_file_name, Batch, ContractInputs, Transaction, NA};

use crate::classify::ClassifyContext;
use crate::error::ReportError;
use crate::lookup::{is_address, AddressBook, Permissions};
use crate::model::{ClassificationResult, ClassifierReport, ReportSet, TxPosition};
use crate::render::ReportRenderer;

pub const RESIDUAL: &str = "residual";

/// Indices claimed in one batch, across every classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSet {
    pub file_name: String,
    pub covered: BTreeSet<usize>,
    pub total: usize,
}

impl CoverageSet {
    pub fn new(file_name: impl Into<String>, total: usize) -> Self {
        Self {
            file_name: file_name.into(),
            covered: BTreeSet::new(),
            total,
        }
    }

    /// `(covered, uncovered)` where `uncovered` is the symmetric difference of
    /// the full index range and `covered`.
    pub fn partition(&self) -> (BTreeSet<usize>, BTreeSet<usize>) {
        let all: BTreeSet<usize> = (0..self.total).collect();
        let uncovered = all.symmetric_difference(&self.covered).copied().collect();
        (self.covered.clone(), uncovered)
    }

    /// Indices to report as residual.
    ///
    /// When nothing at all was covered only index 0 is reported, whatever
    /// the batch length.
    pub fn uncovered(&self) -> BTreeSet<usize> {
        if self.covered.is_empty() {
            return BTreeSet::from([0]);
        }
        self.partition().1
    }

    pub fn is_complete(&self) -> bool {
        self.uncovered().is_empty()
    }
}

/// Coverage of every batch plus the structural problems found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    pub batches: Vec<CoverageSet>,
    pub errors: Vec<ReportError>,
}

impl Coverage {
    pub fn get(&self, file_name: &str) -> Option<&CoverageSet> {
        self.batches.iter().find(|c| c.file_name == file_name)
    }
}

/// Union of claimed indices per batch, in batch order.
///
/// Reports for unknown files and out-of-range indices are skipped; empty
/// batches get no coverage set. Each problem is logged and recorded.
pub fn compute_coverage(batches: &[Batch], report_sets: &[ReportSet]) -> Coverage {
    let mut coverage = Coverage::default();
    // file name -> (batch length, slot in coverage.batches); first batch wins
    let mut index: HashMap<&str, (usize, Option<usize>)> = HashMap::with_capacity(batches.len());
    for batch in batches {
        if index.contains_key(batch.file_name.as_str()) {
            continue;
        }
        let slot = if batch.is_empty() {
            let err = ReportError::EmptyBatch(batch.file_name.clone());
            log::warn!("{err}");
            coverage.errors.push(err);
            None
        } else {
            coverage.batches.push(CoverageSet::new(batch.file_name.clone(), batch.len()));
            Some(coverage.batches.len() - 1)
        };
        index.insert(batch.file_name.as_str(), (batch.len(), slot));
    }

    for set in report_sets {
        for report in set {
            let Some(&(len, slot)) = index.get(report.file_name.as_str()) else {
                let err = ReportError::UnknownBatch(report.file_name.clone());
                log::warn!("{}: {err}", set.classifier);
                coverage.errors.push(err);
                continue;
            };
            let Some(slot) = slot else {
                continue;
            };
            for output in &report.outputs {
                if output.tx_index >= len {
                    let err = ReportError::IndexOutOfRange {
                        file_name: report.file_name.clone(),
                        tx_index: output.tx_index,
                        len,
                    };
                    log::warn!("{}: {err}", set.classifier);
                    coverage.errors.push(err);
                    continue;
                }
                coverage.batches[slot].covered.insert(output.tx_index);
            }
        }
    }
    coverage
}

/// Compute coverage and build the residual report set.
pub fn reconcile(
    batches: &[Batch],
    report_sets: &[ReportSet],
    ctx: &ClassifyContext<'_>,
    renderer: &dyn ReportRenderer,
) -> (ReportSet, Coverage) {
    let coverage = compute_coverage(batches, report_sets);
    let mut residual = ReportSet::new(RESIDUAL);
    let mut by_name: HashMap<&str, &Batch> = HashMap::with_capacity(batches.len());
    for batch in batches {
        by_name.entry(batch.file_name.as_str()).or_insert(batch);
    }

    for entry in &coverage.batches {
        let uncovered = entry.uncovered();
        log::info!(
            "{}: covered {:?}, uncovered {:?}, total {}",
            entry.file_name,
            entry.covered,
            uncovered,
            entry.total
        );
        if uncovered.is_empty() {
            log::info!("full coverage for {}", entry.file_name);
            continue;
        }
        let Some(batch) = by_name.get(entry.file_name.as_str()) else {
            continue;
        };
        residual.insert(residual_report(batch, &uncovered, ctx, renderer));
    }
    (residual, coverage)
}

/// Residual report for the given uncovered indices of one batch.
pub fn residual_report(
    batch: &Batch,
    uncovered: &BTreeSet<usize>,
    ctx: &ClassifyContext<'_>,
    renderer: &dyn ReportRenderer,
) -> ClassifierReport {
    let chain = ctx.book.chain_name(batch.chain_id).unwrap_or_else(|| {
        log::warn!("{}: chain {} not in address book", batch.file_name, batch.chain_id);
        batch.chain_id.to_string()
    });

    let outputs: Vec<ClassificationResult> = uncovered
        .iter()
        .filter_map(|&tx_index| batch.transactions.get(tx_index).map(|tx| (tx_index, tx)))
        .map(|(tx_index, tx)| residual_entry(batch, tx, tx_index, &chain, ctx))
        .collect();

    ClassifierReport {
        classifier: RESIDUAL.to_string(),
        file_name: batch.file_name.clone(),
        report_text: renderer.render(&batch.file_name, &outputs),
        outputs,
        forum_link: batch.forum_link.clone(),
    }
}

fn residual_entry(
    batch: &Batch,
    tx: &Transaction,
    tx_index: usize,
    chain: &str,
    ctx: &ClassifyContext<'_>,
) -> ClassificationResult {
    let position = TxPosition {
        chain_id: batch.chain_id,
        bip_number: tx
            .meta_bip_number()
            .map(str::to_string)
            .unwrap_or_else(|| bip_from_file_name(&batch.file_name)),
        tx_index,
    };
    let to_name = ctx.book.reverse(chain, &tx.to).unwrap_or_else(|| "Not Found".to_string());
    let inputs = match (tx.inputs(), tx.data.as_deref()) {
        (Some(inputs), _) => pretty(&prettify_inputs(chain, inputs, ctx.book, ctx.permissions)),
        (None, Some(data)) if !data.is_empty() => pretty(&Value::String(data.to_string())),
        _ => NA.to_string(),
    };

    ClassificationResult::new(&position, chain)
        .with_field("fx_name", tx.method_name())
        .with_field("to", format!("{} ({to_name})", tx.to))
        .with_field("value", tx.value.clone().unwrap_or_else(|| "!!N/A!!".to_string()))
        .with_field("inputs", inputs)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Annotate contract inputs for human review.
///
/// Addresses gain their address-book name, action ids under a `role`-like
/// key gain their permission paths. A key holding anything else keeps its
/// raw value.
pub fn prettify_inputs(
    chain: &str,
    inputs: &ContractInputs,
    book: &dyn AddressBook,
    permissions: &dyn Permissions,
) -> Value {
    let mut out = Map::new();
    for (key, value) in inputs.iter() {
        let role_key = key.contains("role") || key.contains("Role");
        let annotated: Option<Vec<Value>> = value
            .values()
            .into_iter()
            .map(|item| {
                if is_address(item) {
                    let name = book.reverse(chain, item).unwrap_or_else(|| NA.to_string());
                    Some(Value::String(format!("{item} ({name}) ")))
                } else if role_key {
                    let paths = permissions
                        .action_paths(chain, item)
                        .map(|p| p.join(", "))
                        .unwrap_or_else(|| NA.to_string());
                    Some(Value::String(format!("{item} ({paths}) ")))
                } else {
                    None
                }
            })
            .collect();
        let rendered = match annotated {
            Some(items) if !items.is_empty() => Value::Array(items),
            _ => value.to_json(),
        };
        out.insert(key.to_string(), rendered);
    }
    Value::Object(out)
}
