pub mod libs;

pub use libs::config::{GhConfig, ScoreBucketing};
pub use libs::error::{GhError, Result};
pub use libs::ids::{IdMapping, SequenceLengths};
pub use libs::occurrence::Occurrence;
