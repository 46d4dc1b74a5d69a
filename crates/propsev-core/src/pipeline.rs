// Sequential reconciliation pipeline: feeds in order, then derivation, then
// the empty-record filter, then scoring.

use crate::adapter::{AdapterError, FeedTriple, IngestSummary, SourceAdapter};
use crate::derive::{self, DeriveError, DeriveSummary};
use crate::names::NameResolver;
use crate::registry::Registry;
use crate::scoring::{self, ScoringConfig, ScoringError};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Derive(#[from] DeriveError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// One feed's adapter together with the triples its reader extracted.
#[derive(Debug, Clone)]
pub struct FeedBatch {
    pub adapter: SourceAdapter,
    pub triples: Vec<FeedTriple>,
}

/// The scored registry plus what each stage did.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub registry: Registry,
    pub ingests: Vec<(String, IngestSummary)>,
    pub derived: DeriveSummary,
    pub dropped: Vec<String>,
}

/// Immutable configuration shared by every stage.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    resolver: &'a NameResolver,
    scoring: &'a ScoringConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(resolver: &'a NameResolver, scoring: &'a ScoringConfig) -> Self {
        Self { resolver, scoring }
    }

    /// Run every stage once, in order, over a freshly built registry.
    ///
    /// Feeds are ingested in the order given; derivation only sees the
    /// combined totals after every feed has written its direct observations.
    pub fn run<I>(&self, mut registry: Registry, feeds: I) -> Result<PipelineOutcome, PipelineError>
    where
        I: IntoIterator<Item = FeedBatch>,
    {
        for alias in self.resolver.shadowed_aliases(&registry) {
            warn!("Alias '{}' is also a roster name; using the roster spelling", alias);
        }

        let mut ingests = Vec::new();
        let mut pending = Vec::new();
        for batch in feeds {
            let mut summary = batch
                .adapter
                .ingest(batch.triples, &mut registry, self.resolver)?;
            pending.append(&mut summary.combined);
            ingests.push((batch.adapter.feed().to_string(), summary));
        }

        let derived = derive::resolve_all(&mut registry, &pending)?;

        let dropped = registry.retain_with_stats();
        info!(
            "Dropped {} players with no projection data; {} remain",
            dropped.len(),
            registry.len()
        );

        scoring::score_all(&mut registry, self.scoring)?;

        Ok(PipelineOutcome {
            registry,
            ingests,
            derived,
            dropped,
        })
    }
}
