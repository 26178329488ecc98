pub mod group;
pub mod linkset;
pub mod record;

pub use group::{Discard, OccurrenceGroup, Verdict};
pub use linkset::{DiscardCounts, LinkId, LinkSet};
pub use record::Link;
