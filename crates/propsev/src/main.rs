// Props evaluator entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so the report on stdout stays clean)
// 2. Load config
// 3. Run the pipeline (scoring overrides, roster, feeds, derive, score)
// 4. Print per-position tables, write CSVs when configured

use propsev::app;
use propsev::config;
use propsev::render;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Props evaluator starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} feeds, top {} per position",
        config.feeds.len(),
        config.report.top_n
    );

    // 3. Run the pipeline
    let base_dir = std::env::current_dir().context("failed to read working directory")?;
    let outcome = app::run(&config, &base_dir)?;

    // 4. Report
    let layout = config.report.layout();
    print!(
        "{}",
        render::render_report(&outcome.registry, &layout, config.report.top_n)
    );

    if let Some(dir) = &config.report.output_dir {
        render::write_csv_reports(&outcome.registry, &layout, config.report.top_n, &base_dir.join(dir))
            .context("failed to write CSV reports")?;
    }

    info!("Done");
    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG=debug` shows skipped names,
/// ignored labels and per-player derivations.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("propsev=info,propsev_core=info,propsev_feeds=info,warn")
        }))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
