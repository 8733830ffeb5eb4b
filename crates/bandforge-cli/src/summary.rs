use std::path::Path;

use bandforge_core::io::manifest::BatchManifest;
use bandforge_core::pipeline::config::ProductConfig;
use bandforge_core::pipeline::BatchReport;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    ok: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            ok: Style::new().green().bold(),
            error: Style::new().red().bold(),
        }
    }
}

pub fn print_run_summary(manifest: &BatchManifest) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Bandforge Batch"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Scenes"),
        s.value.apply_to(manifest.scenes.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(manifest.output.display())
    );
    println!(
        "  {:<14}{} ({})",
        s.label.apply_to("Ledger"),
        s.path.apply_to(manifest.ledger.display()),
        s.method.apply_to(manifest.ledger_format)
    );
    println!();

    print_processing_section(&s, &manifest.processing);
}

fn print_processing_section(s: &Styles, config: &ProductConfig) {
    println!("  {}", s.header.apply_to("Bands"));
    for (role, band) in config.bands.iter() {
        println!(
            "    {:<12}{}",
            s.label.apply_to(role),
            s.value.apply_to(format!("band {band}"))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Indices"));
    if config.indices.is_empty() {
        println!("    {}", s.disabled.apply_to("none"));
    }
    for index in &config.indices {
        println!("    {}", s.method.apply_to(index));
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scaling"),
        s.value.apply_to(config.index_scaling)
    );
    if config.threshold.is_enabled() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Threshold"),
            s.value.apply_to(config.threshold)
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Threshold"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    if config.composites.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Composites"),
            s.disabled.apply_to("none")
        );
    } else {
        println!("  {}", s.header.apply_to("Composites"));
        for composite in &config.composites {
            let roles: Vec<String> = composite.bands.iter().map(|r| r.to_string()).collect();
            println!(
                "    {:<12}{}",
                s.label.apply_to(&composite.name),
                s.value.apply_to(roles.join(", "))
            );
        }
    }
    println!();

    if let Some(ref rgba) = config.rgba {
        println!("  {}", s.header.apply_to("RGBA"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Alpha index"),
            s.method.apply_to(&rgba.index)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Cutoff"),
            s.value.apply_to(rgba.alpha_cutoff.0)
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("RGBA"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();
}

pub fn print_batch_report(report: &BatchReport, ledger: &Path, appended: usize) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Succeeded"),
        s.ok.apply_to(report.succeeded())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Failed"),
        if report.failed() == 0 {
            s.value.apply_to(report.failed())
        } else {
            s.error.apply_to(report.failed())
        }
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Products"),
        s.value.apply_to(report.products_written())
    );
    println!(
        "  {:<14}{} record(s) appended to {}",
        s.label.apply_to("Ledger"),
        s.value.apply_to(appended),
        s.path.apply_to(ledger.display())
    );

    if report.failed() > 0 {
        println!();
        println!("  {}", s.header.apply_to("Failures"));
        for (file_id, error) in report.failures() {
            println!("    {:<20}{}", s.label.apply_to(file_id), s.error.apply_to(error));
        }
    }
    println!();
}
