use payload_core::Batch;

use crate::classify::{Classifier, ClassifyContext};
use crate::model::{ClassifierReport, ReportSet, TxPosition};
use crate::render::ReportRenderer;

/// Run one classifier over every transaction of every batch.
///
/// A batch only gets a report when at least one of its transactions
/// classified.
pub fn dispatch(
    batches: &[Batch],
    classifier: &dyn Classifier,
    ctx: &ClassifyContext<'_>,
    renderer: &dyn ReportRenderer,
) -> ReportSet {
    log::info!("processing {} batches with {}", batches.len(), classifier.name());
    let mut set = ReportSet::new(classifier.name());
    for batch in batches {
        if let Some(report) = classify_batch(batch, classifier, ctx, renderer) {
            set.insert(report);
        }
    }
    set
}

/// Classify one batch. `None` when nothing in it was recognized.
pub fn classify_batch(
    batch: &Batch,
    classifier: &dyn Classifier,
    ctx: &ClassifyContext<'_>,
    renderer: &dyn ReportRenderer,
) -> Option<ClassifierReport> {
    let batch_bip = batch.bip_number();
    let outputs: Vec<_> = batch
        .transactions
        .iter()
        .enumerate()
        .filter_map(|(tx_index, tx)| {
            let position = TxPosition {
                chain_id: batch.chain_id,
                bip_number: tx.meta_bip_number().map(str::to_string).unwrap_or_else(|| batch_bip.clone()),
                tx_index,
            };
            classifier.classify(tx, &position, ctx)
        })
        .collect();

    if outputs.is_empty() {
        return None;
    }
    log::debug!("{}: {} matched {} transaction(s)", batch.file_name, classifier.name(), outputs.len());
    Some(ClassifierReport {
        classifier: classifier.name().to_string(),
        file_name: batch.file_name.clone(),
        report_text: renderer.render(&batch.file_name, &outputs),
        outputs,
        forum_link: batch.forum_link.clone(),
    })
}
