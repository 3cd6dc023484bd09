pub mod engine;
pub mod error;
pub mod normalizer;
pub mod result_matcher;

pub use engine::{ScoringEngine, ScoringRules};
pub use error::ScoringError;
pub use normalizer::NameNormalizer;
