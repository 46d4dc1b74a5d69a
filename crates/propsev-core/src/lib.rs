// Props reconciliation core: canonical player registry, feed name and label
// reconciliation, derived stats, and weighted scoring.

pub mod adapter;
pub mod derive;
pub mod names;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod scoring;
pub mod stats;
