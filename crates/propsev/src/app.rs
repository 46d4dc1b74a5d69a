// Application orchestration: load inputs named by the config, run the
// pipeline, hand the scored registry to the renderer.

use crate::config::Config;
use anyhow::Context;
use propsev_core::adapter::SourceAdapter;
use propsev_core::pipeline::{FeedBatch, Pipeline, PipelineOutcome};
use propsev_core::registry::load_roster;
use propsev_core::scoring::ScoringConfig;
use propsev_feeds::read_feed_file;
use std::path::Path;
use tracing::info;

/// Load the scoring weights: built-in defaults, plus the override file when
/// the config names one.
pub fn load_scoring(config: &Config, base_dir: &Path) -> anyhow::Result<ScoringConfig> {
    match &config.data_paths.scoring_overrides {
        Some(rel) => {
            let path = base_dir.join(rel);
            ScoringConfig::load_with_overrides(&path)
                .with_context(|| format!("failed to load scoring overrides from {}", path.display()))
        }
        None => {
            info!("No scoring overrides configured; using built-in weights");
            Ok(ScoringConfig::default())
        }
    }
}

/// Read every configured feed, in config order, into pipeline batches.
pub fn load_feeds(config: &Config, base_dir: &Path) -> anyhow::Result<Vec<FeedBatch>> {
    let mut batches = Vec::with_capacity(config.feeds.len());
    for feed in &config.feeds {
        let path = base_dir.join(&feed.path);
        let triples = read_feed_file(&path, feed.format)
            .with_context(|| format!("failed to read feed `{}`", feed.name))?;
        let labels = config
            .label_map(feed.format)
            .with_context(|| format!("bad label map for feed `{}`", feed.name))?;
        batches.push(FeedBatch {
            adapter: SourceAdapter::new(feed.name.as_str(), labels),
            triples,
        });
    }
    Ok(batches)
}

/// Run the whole pipeline with paths resolved against `base_dir`.
///
/// Scoring overrides are loaded before the roster and any feed so a bad
/// override file fails the run before any document is touched.
pub fn run(config: &Config, base_dir: &Path) -> anyhow::Result<PipelineOutcome> {
    let scoring = load_scoring(config, base_dir)?;

    let roster_path = base_dir.join(&config.data_paths.roster);
    let registry = load_roster(&roster_path)
        .with_context(|| format!("failed to load roster from {}", roster_path.display()))?;

    let resolver = config
        .name_resolver()
        .context("invalid [names] configuration")?;

    let batches = load_feeds(config, base_dir)?;

    let outcome = Pipeline::new(&resolver, &scoring)
        .run(registry, batches)
        .context("projection pipeline failed")?;

    info!(
        "Pipeline finished: {} scored players from {} feeds",
        outcome.registry.len(),
        outcome.ingests.len()
    );

    Ok(outcome)
}
