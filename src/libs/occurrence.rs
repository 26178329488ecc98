use std::fmt;

/// One seed occurrence: where a k-mer was seen.
///
/// Field order drives the derived ordering: genome, then sequence, then
/// position, then strand. The k-mer string itself is not kept, two
/// occurrences at the same spot compare equal whatever seed produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occurrence {
    pub genome: u8,
    pub sequence: u32,
    pub position: u64,
    pub reverse: bool,
}

impl Occurrence {
    pub fn new(genome: u8, sequence: u32, position: u64, reverse: bool) -> Self {
        Self {
            genome,
            sequence,
            position,
            reverse,
        }
    }

    /// Same genome, sequence and strand
    pub fn same_sequence(&self, other: &Occurrence) -> bool {
        self.genome == other.genome
            && self.sequence == other.sequence
            && self.reverse == other.reverse
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.genome,
            self.sequence,
            self.position,
            if self.reverse { '-' } else { '+' }
        )
    }
}
