use payload_core::Batch;

use crate::classify::{default_registry, Classifier, ClassifyContext};
use crate::coverage::{reconcile, Coverage};
use crate::dispatch::dispatch;
use crate::merge::merge;
use crate::model::{MergedReports, ReportSet};
use crate::render::ReportRenderer;

/// Classifier registry plus the collaborators every pass shares.
pub struct Pipeline<'a> {
    classifiers: Vec<Box<dyn Classifier>>,
    ctx: ClassifyContext<'a>,
    renderer: &'a dyn ReportRenderer,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// One set per registered classifier, in registry order.
    pub report_sets: Vec<ReportSet>,
    pub residual: ReportSet,
    pub coverage: Coverage,
    pub merged: MergedReports,
}

impl PipelineOutput {
    pub fn reports_for(&self, classifier: &str) -> Option<&ReportSet> {
        self.report_sets.iter().find(|s| s.classifier == classifier)
    }
}

impl<'a> Pipeline<'a> {
    /// Pipeline over the built-in classifiers.
    pub fn new(ctx: ClassifyContext<'a>, renderer: &'a dyn ReportRenderer) -> Self {
        Self {
            classifiers: default_registry(),
            ctx,
            renderer,
        }
    }

    /// Replace the registry. Order only changes report layout.
    pub fn with_classifiers(mut self, classifiers: Vec<Box<dyn Classifier>>) -> Self {
        self.classifiers = classifiers;
        self
    }

    pub fn classifier_names(&self) -> Vec<&'static str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    /// Dispatch every classifier, then reconcile coverage once all passes are
    /// done, then merge with the residual last.
    pub fn run(&self, batches: &[Batch]) -> PipelineOutput {
        let report_sets: Vec<ReportSet> = self
            .classifiers
            .iter()
            .map(|classifier| dispatch(batches, classifier.as_ref(), &self.ctx, self.renderer))
            .collect();

        let (residual, coverage) = reconcile(batches, &report_sets, &self.ctx, self.renderer);
        let merged = merge(report_sets.iter().chain(std::iter::once(&residual)));
        log::info!(
            "{} batch(es): {} merged report(s), {} with uncovered transactions",
            batches.len(),
            merged.len(),
            residual.len()
        );

        PipelineOutput {
            report_sets,
            residual,
            coverage,
            merged,
        }
    }
}
