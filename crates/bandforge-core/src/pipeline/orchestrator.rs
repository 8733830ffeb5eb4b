use tracing::{info, warn};

use crate::error::Result;
use crate::ledger::LedgerSink;

use super::config::ProductConfig;
use super::products::derive_products;
use super::scene::SceneSource;
use super::types::{
    BatchReport, FileOutcome, NoOpReporter, PipelineStage, ProductSink, ProgressReporter,
};

/// Process every source in order, writing products and ledger records.
///
/// The configuration is validated once up front; an invalid configuration
/// fails the whole call before any scene is touched. After that, each scene
/// is isolated: its failure is logged and recorded in the report, and the
/// loop moves on to the next scene.
pub fn run_batch<S: SceneSource>(
    sources: &[S],
    config: &ProductConfig,
    products: &mut dyn ProductSink,
    ledger: &mut dyn LedgerSink,
) -> Result<BatchReport> {
    run_batch_reported(sources, config, products, ledger, &NoOpReporter)
}

/// Run the batch with a progress reporter.
pub fn run_batch_reported<S: SceneSource>(
    sources: &[S],
    config: &ProductConfig,
    products: &mut dyn ProductSink,
    ledger: &mut dyn LedgerSink,
    reporter: &dyn ProgressReporter,
) -> Result<BatchReport> {
    config.validate()?;

    info!(scenes = sources.len(), "Starting batch");
    reporter.begin_batch(sources.len());

    let mut report = BatchReport::default();
    for (done, source) in sources.iter().enumerate() {
        let result = process_source(source, config, products, ledger, reporter);
        match &result {
            Ok(written) => info!(file = source.id(), products = written, "Scene complete"),
            Err(e) => warn!(file = source.id(), error = %e, "Scene failed"),
        }
        report.outcomes.push(FileOutcome {
            file_id: source.id().to_string(),
            result,
        });
        reporter.advance(done + 1);
    }

    reporter.finish_batch();
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Batch complete"
    );
    Ok(report)
}

/// Load, derive, write, then record. The ledger append is the last step, so a
/// scene that fails anywhere earlier leaves no record behind.
fn process_source<S: SceneSource>(
    source: &S,
    config: &ProductConfig,
    products: &mut dyn ProductSink,
    ledger: &mut dyn LedgerSink,
    reporter: &dyn ProgressReporter,
) -> Result<usize> {
    let id = source.id();

    reporter.begin_stage(id, PipelineStage::Loading);
    let scene = source.load()?;

    reporter.begin_stage(id, PipelineStage::Deriving);
    let derived = derive_products(&scene, config)?;

    reporter.begin_stage(id, PipelineStage::Writing);
    for product in &derived.products {
        products.write(&derived.file_id, product)?;
    }

    reporter.begin_stage(id, PipelineStage::Recording);
    ledger.append(derived.record)?;

    Ok(derived.products.len())
}
