use crate::libs::error::{GhError, Result};
use std::fmt;

/// Largest tile distance magnitude, 40 bits
pub const MAX_TILE_DISTANCE: i64 = 0x7f_ffff_ffff;

/// Packs a signed tile distance as `(|d| << 1) | sign`
///
/// ```
/// use ghcube::libs::cube::tile::{decode, encode, MAX_TILE_DISTANCE};
///
/// assert_eq!(encode(3).unwrap(), 6);
/// assert_eq!(encode(-3).unwrap(), 7);
/// assert_eq!(decode(encode(-MAX_TILE_DISTANCE).unwrap()), -MAX_TILE_DISTANCE);
/// assert!(encode(MAX_TILE_DISTANCE + 1).is_err());
/// ```
pub fn encode(distance: i64) -> Result<u64> {
    let magnitude = distance.unsigned_abs();
    if magnitude > MAX_TILE_DISTANCE as u64 {
        return Err(GhError::TileDistanceRange {
            distance,
            max: MAX_TILE_DISTANCE,
        });
    }
    Ok((magnitude << 1) | (distance < 0) as u64)
}

/// Inverse of [`encode`]
pub fn decode(packed: u64) -> i64 {
    let magnitude = (packed >> 1) as i64;
    if packed & 1 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// `floor((position - reference) / tile_size)` in double precision.
///
/// A tile size of 0 puts everything into tile 0, which turns a cube into a
/// plain sequence tuple.
pub fn positions_to_tile(position: u64, reference: u64, tile_size: u64) -> i64 {
    if tile_size == 0 {
        return 0;
    }
    let j = position as f64;
    let i = reference as f64;
    ((j - i) / tile_size as f64).floor() as i64
}

/// Signed distance of one genome's tile to the reference tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileDistance {
    pub genome: u8,
    pub sequence: u32,
    distance: i64,
    pub reverse: bool,
}

impl TileDistance {
    pub fn new(genome: u8, sequence: u32, distance: i64, reverse: bool) -> Result<Self> {
        encode(distance)?;
        Ok(Self {
            genome,
            sequence,
            distance,
            reverse,
        })
    }

    /// Rebuilds a tile distance from its packed form
    pub fn from_packed(genome: u8, sequence: u32, packed: u64, reverse: bool) -> Result<Self> {
        Self::new(genome, sequence, decode(packed), reverse)
    }

    pub fn distance(&self) -> i64 {
        self.distance
    }

    pub fn packed(&self) -> u64 {
        // range checked on construction
        (self.distance.unsigned_abs() << 1) | (self.distance < 0) as u64
    }

    /// Same tile moved by `delta` tiles
    pub fn shifted(&self, delta: i64) -> Result<Self> {
        let distance = self
            .distance
            .checked_add(delta)
            .ok_or(GhError::TileDistanceRange {
                distance: self.distance,
                max: MAX_TILE_DISTANCE,
            })?;
        Self::new(self.genome, self.sequence, distance, self.reverse)
    }
}

impl fmt::Display for TileDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.genome,
            self.sequence,
            self.distance,
            if self.reverse { '-' } else { '+' }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_extremes() {
        for d in [
            0,
            1,
            -1,
            255,
            -256,
            MAX_TILE_DISTANCE,
            -MAX_TILE_DISTANCE,
            MAX_TILE_DISTANCE - 1,
        ] {
            let t = TileDistance::new(2, 9, d, true).unwrap();
            assert_eq!(t.distance(), d);
            assert_eq!(decode(t.packed()), d);
            assert_eq!(TileDistance::from_packed(2, 9, t.packed(), true).unwrap(), t);
        }
        assert_eq!(encode(0).unwrap(), 0);
        assert_eq!(encode(MAX_TILE_DISTANCE).unwrap(), 0xff_ffff_fffe);
        assert_eq!(encode(-MAX_TILE_DISTANCE).unwrap(), 0xff_ffff_ffff);
    }

    #[test]
    fn test_out_of_range() {
        for d in [MAX_TILE_DISTANCE + 1, -MAX_TILE_DISTANCE - 1, i64::MIN, i64::MAX] {
            assert!(matches!(
                TileDistance::new(0, 0, d, false),
                Err(GhError::TileDistanceRange { .. })
            ));
        }
        let t = TileDistance::new(1, 1, MAX_TILE_DISTANCE, false).unwrap();
        assert!(t.shifted(1).is_err());
        assert_eq!(t.shifted(-1).unwrap().distance(), MAX_TILE_DISTANCE - 1);
    }

    #[test]
    fn test_positions_to_tile() {
        assert_eq!(positions_to_tile(150, 100, 100), 0);
        assert_eq!(positions_to_tile(199, 100, 100), 0);
        assert_eq!(positions_to_tile(200, 100, 100), 1);
        // floor, not truncation
        assert_eq!(positions_to_tile(99, 100, 100), -1);
        assert_eq!(positions_to_tile(0, 100, 100), -1);
        assert_eq!(positions_to_tile(0, 101, 100), -2);
        assert_eq!(positions_to_tile(12345, 0, 0), 0);
    }

    #[test]
    fn test_display() {
        let t = TileDistance::new(3, 7, -2, true).unwrap();
        assert_eq!(t.to_string(), "3:7:-2:-");
    }
}
