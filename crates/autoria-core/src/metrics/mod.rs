//! Per-document metric extractors.
//!
//! Each extractor is a pure function of the text in its own module. The
//! engine runs them as independent stages and gathers the outputs into a
//! [`MetricBundle`]; callers can also invoke any of them directly.

pub mod citation;
pub mod complexity;
pub mod conclusion;
pub mod perfection;
pub mod perplexity;
pub mod reports;
pub mod richness;
pub mod structure;
pub mod voice;

pub use citation::citation_density;
pub use complexity::lexical_complexity;
pub use conclusion::conclusion_score;
pub use perfection::perfection_score;
pub use perplexity::perplexity_proxy;
pub use reports::{ConclusionResult, MetricBundle, PerplexityResult, StructureReport};
pub use richness::lexical_richness;
pub use structure::structural_penalty;
pub use voice::personal_voice;
