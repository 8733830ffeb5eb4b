use std::path::PathBuf;

use anyhow::{Context, Result};
use bandforge_core::composite::AlphaCutoff;
use bandforge_core::io::image_io::DirectorySink;
use bandforge_core::io::ledger_file::LedgerFile;
use bandforge_core::io::manifest::BatchManifest;
use bandforge_core::ledger::LedgerFormat;
use bandforge_core::pipeline::{run_batch_reported, PipelineStage, ProgressReporter};
use bandforge_core::threshold::Threshold;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::summary::{print_batch_report, print_run_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Batch manifest (TOML)
    pub manifest: PathBuf,

    /// Override the product output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the ledger file
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Override the ledger format
    #[arg(long, value_enum)]
    pub ledger_format: Option<LedgerFormatArg>,

    /// Classify index products: pixels below this value become 1, others 0
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Disable index classification even if the manifest enables it
    #[arg(long, conflicts_with = "threshold")]
    pub no_threshold: bool,

    /// Index value below which RGBA pixels are opaque
    #[arg(long)]
    pub alpha_cutoff: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LedgerFormatArg {
    Text,
    Toml,
}

impl From<LedgerFormatArg> for LedgerFormat {
    fn from(arg: LedgerFormatArg) -> Self {
        match arg {
            LedgerFormatArg::Text => LedgerFormat::Text,
            LedgerFormatArg::Toml => LedgerFormat::Toml,
        }
    }
}

struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_batch(&self, total_scenes: usize) {
        self.pb.set_length(total_scenes as u64);
    }

    fn begin_stage(&self, file_id: &str, stage: PipelineStage) {
        self.pb.set_message(format!("{file_id}: {stage}"));
    }

    fn advance(&self, scenes_done: usize) {
        self.pb.set_position(scenes_done as u64);
    }

    fn finish_batch(&self) {
        self.pb.finish_with_message("Done");
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut manifest = BatchManifest::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;
    apply_overrides(&mut manifest, args);

    print_run_summary(&manifest);

    let mut products = DirectorySink::create(&manifest.output).with_context(|| {
        format!(
            "Failed to create output directory {}",
            manifest.output.display()
        )
    })?;
    let mut ledger = LedgerFile::open(&manifest.ledger, manifest.ledger_format)
        .with_context(|| format!("Failed to open ledger {}", manifest.ledger.display()))?;

    let pb = ProgressBar::new(manifest.scenes.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:40} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { pb };

    let report = run_batch_reported(
        &manifest.scenes,
        &manifest.processing,
        &mut products,
        &mut ledger,
        &reporter,
    )
    .context("Invalid processing configuration")?;

    print_batch_report(&report, ledger.path(), ledger.appended());

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} scenes failed",
            report.failed(),
            report.outcomes.len()
        );
    }

    Ok(())
}

fn apply_overrides(manifest: &mut BatchManifest, args: &RunArgs) {
    if let Some(ref output) = args.output {
        manifest.output = output.clone();
    }
    if let Some(ref ledger) = args.ledger {
        manifest.ledger = ledger.clone();
    }
    if let Some(format) = args.ledger_format {
        manifest.ledger_format = format.into();
    }
    if let Some(cutoff) = args.threshold {
        manifest.processing.threshold = Threshold::Below(cutoff);
    } else if args.no_threshold {
        manifest.processing.threshold = Threshold::Disabled;
    }
    if let Some(cutoff) = args.alpha_cutoff {
        match manifest.processing.rgba {
            Some(ref mut rgba) => rgba.alpha_cutoff = AlphaCutoff(cutoff),
            None => debug!(cutoff, "No RGBA product configured, ignoring --alpha-cutoff"),
        }
    }
    debug!(
        output = %manifest.output.display(),
        ledger = %manifest.ledger.display(),
        threshold = %manifest.processing.threshold,
        "Applied command-line overrides"
    );
}
