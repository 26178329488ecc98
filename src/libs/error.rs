//! Errors raised by the link and cube machinery.
//!
//! All of them are fatal: nothing in the core retries or recovers, so a
//! variant carries enough context (the offending link or cube, the parameter
//! values) to debug a misconfigured run from the message alone.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GhError {
    /// A tile distance does not fit into 40 bits of magnitude
    #[error("tile distance {distance} out of range [-{max:#x}, {max:#x}]")]
    TileDistanceRange { distance: i64, max: i64 },

    /// Two occurrences of a link share a genome
    #[error("only one occurrence per genome allowed, genome {genome} seen twice in {link}")]
    DuplicateGenome { genome: u8, link: String },

    /// The link already holds the maximum number of occurrences
    #[error("link {link} cannot hold more than {max} occurrences")]
    LinkFull { max: usize, link: String },

    /// Requested occurrence index is past the end of the link
    #[error("link {link} has no occurrence at index {index}")]
    MissingOccurrence { index: usize, link: String },

    /// A cube was requested from a link without the reference genome
    #[error("cannot create a cube from link {link}, reference genome 0 is missing")]
    MissingReference { link: String },

    /// A genome or sequence ID is unknown to the identifier mapping
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// No length is registered for a sequence of a cube
    #[error("no length known for sequence {sequence} of cube {cube}")]
    UnknownSequenceLength { sequence: u32, cube: String },

    /// A link's occurrences do not fit into tile distances
    #[error("cannot tile link {link} with tile size {tile_size}: {source}")]
    Tiling {
        link: String,
        tile_size: u64,
        #[source]
        source: Box<GhError>,
    },

    /// The summed sequence length of a genome is zero
    #[error("genome {genome} has a summed sequence length of zero, link fraction undefined")]
    ZeroGenomeLength { genome: u8 },

    /// Inconsistent cube geometry
    #[error("geometry of cube {cube} (tile size {tile_size}, chunk size {chunk_size}): {message}")]
    Geometry {
        cube: String,
        tile_size: u64,
        chunk_size: u64,
        message: String,
    },

    /// Invalid or inconsistent configuration values
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GhError>;

impl GhError {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::UnknownIdentifier(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
