use crate::libs::cube::tile::{positions_to_tile, TileDistance};
use crate::libs::error::{GhError, Result};
use crate::libs::ids::SequenceLengths;
use crate::libs::link::Link;
use itertools::Itertools;
use std::fmt;

/// Length and chunk range of the region a cube spans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoProperties {
    pub length: u64,
    pub min_chunk: u64,
    pub max_chunk: u64,
}

/// Tile distances of a link's occurrences relative to its reference occurrence.
///
/// The first entry always belongs to genome 0 and has distance 0. Equality,
/// ordering and hashing are structural over the whole vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cube {
    tiles: Vec<TileDistance>,
}

impl Cube {
    pub fn from_link(link: &Link, tile_size: u64) -> Result<Self> {
        let reference = match link.occurrences().first() {
            Some(occ) if occ.genome == 0 => occ.position,
            _ => {
                return Err(GhError::MissingReference {
                    link: link.to_string(),
                })
            }
        };
        let tiles = link
            .occurrences()
            .iter()
            .map(|occ| {
                TileDistance::new(
                    occ.genome,
                    occ.sequence,
                    positions_to_tile(occ.position, reference, tile_size),
                    occ.reverse,
                )
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| GhError::Tiling {
                link: link.to_string(),
                tile_size,
                source: Box::new(e),
            })?;
        Ok(Self { tiles })
    }

    // callers keep the genome order and the reference entry intact
    fn from_tiles(tiles: Vec<TileDistance>) -> Self {
        Self { tiles }
    }

    pub fn dimensionality(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[TileDistance] {
        &self.tiles
    }

    pub fn tile(&self, i: usize) -> &TileDistance {
        &self.tiles[i]
    }

    /// The genome 0 entry, key of the tile index
    pub fn reference(&self) -> &TileDistance {
        &self.tiles[0]
    }

    pub fn sequences(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiles.iter().map(|t| t.sequence)
    }

    /// `sub` has fewer genomes and each of its tiles is also a tile of `self`
    pub fn has_subcube(&self, sub: &Cube) -> bool {
        if sub.dimensionality() >= self.dimensionality() {
            return false;
        }
        let mut tiles = self.tiles.iter();
        sub.tiles.iter().all(|t| tiles.any(|s| s == t))
    }

    /// The 2-dimensional cube of the reference and the `i`-th entry
    pub fn pair(&self, i: usize) -> Option<Cube> {
        if i == 0 {
            return None;
        }
        let other = self.tiles.get(i)?;
        Some(Self::from_tiles(vec![self.tiles[0], *other]))
    }

    /// All cubes whose non-reference tiles differ by at most one from this
    /// cube's, the cube itself included
    pub fn neighbours(&self) -> Result<Vec<Cube>> {
        if self.dimensionality() < 2 {
            return Ok(vec![self.clone()]);
        }
        let mut cubes = vec![];
        for shifts in (1..self.dimensionality())
            .map(|_| [-1i64, 0, 1])
            .multi_cartesian_product()
        {
            let mut tiles = Vec::with_capacity(self.tiles.len());
            tiles.push(self.tiles[0]);
            for (t, d) in self.tiles[1..].iter().zip(shifts) {
                tiles.push(t.shifted(d)?);
            }
            cubes.push(Self::from_tiles(tiles));
        }
        Ok(cubes)
    }

    /// Region length and the chunk range of summed positions covered by this
    /// cube at the given tile and chunk sizes
    pub fn geo_properties(
        &self,
        tile_size: u64,
        chunk_size: u64,
        lengths: &SequenceLengths,
    ) -> Result<GeoProperties> {
        let seq_len = |t: &TileDistance| -> Result<i64> {
            lengths
                .get(&t.sequence)
                .map(|&l| l as i64)
                .ok_or_else(|| GhError::UnknownSequenceLength {
                    sequence: t.sequence,
                    cube: self.to_string(),
                })
        };
        let tile = tile_size as i64;

        // overlap of all tiles projected onto the reference axis
        let mut v = seq_len(self.reference())?;
        let mut u = 0i64;
        for t in &self.tiles[1..] {
            let a = tile * t.distance();
            v = v.min(seq_len(t)? - a);
            u = u.max(-a);
        }
        let length = (v - u).max(0);

        if chunk_size == 0 {
            return Ok(GeoProperties {
                length: length as u64,
                min_chunk: 0,
                max_chunk: 0,
            });
        }

        let base0 = u;
        let tip0 = base0 + length - 1;
        let shift = if base0 > 0 { 1 - tile } else { 0 };
        let mut chunk_base = 0i64;
        let mut chunk_tip = 0i64;
        for (i, t) in self.tiles.iter().enumerate() {
            let a = tile * t.distance();
            let base = base0 + a;
            let tip = a + tile - 1 + tip0;
            chunk_base += if base > 0 { base + shift } else { base };
            chunk_tip += if i == 0 {
                tip0
            } else {
                tip.min(seq_len(t)? - 1)
            };
        }

        if chunk_base < 0 {
            return Err(self.geometry_error(tile_size, chunk_size, "base chunk sum negative"));
        }
        if chunk_tip < 0 {
            return Err(self.geometry_error(tile_size, chunk_size, "tip chunk sum negative"));
        }
        let min_chunk = chunk_base as u64 / chunk_size;
        let max_chunk = chunk_tip as u64 / chunk_size;
        if max_chunk < min_chunk {
            return Err(self.geometry_error(
                tile_size,
                chunk_size,
                &format!("max chunk {} smaller than min chunk {}", max_chunk, min_chunk),
            ));
        }
        Ok(GeoProperties {
            length: length as u64,
            min_chunk,
            max_chunk,
        })
    }

    pub(crate) fn geometry_error(&self, tile_size: u64, chunk_size: u64, message: &str) -> GhError {
        GhError::Geometry {
            cube: self.to_string(),
            tile_size,
            chunk_size,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tiles.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::occurrence::Occurrence;

    fn link(occs: &[(u8, u32, u64)]) -> Link {
        Link::new(
            occs.iter()
                .map(|&(g, s, p)| Occurrence::new(g, s, p, false))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_link() {
        let l = link(&[(0, 0, 500), (1, 1, 420), (2, 2, 730)]);
        let c = Cube::from_link(&l, 100).unwrap();
        assert_eq!(c.dimensionality(), 3);
        let d: Vec<i64> = c.tiles().iter().map(|t| t.distance()).collect();
        assert_eq!(d, vec![0, -1, 2]);
        assert_eq!(c.to_string(), "0:0:0:+,1:1:-1:+,2:2:2:+");

        let missing = link(&[(1, 1, 420), (2, 2, 730)]);
        assert!(matches!(
            Cube::from_link(&missing, 100),
            Err(GhError::MissingReference { .. })
        ));

        // 2^40 tiles away from the reference
        let far = link(&[(0, 0, 0), (1, 1, 1 << 40)]);
        let err = Cube::from_link(&far, 1).unwrap_err();
        assert!(matches!(
            &err,
            GhError::Tiling { tile_size: 1, source, .. }
                if matches!(**source, GhError::TileDistanceRange { .. })
        ));
        assert!(err.to_string().contains("1099511627776"));
    }

    #[test]
    fn test_identity_invariance() {
        // different raw positions, same tiles
        let a = link(&[(0, 0, 500), (1, 1, 510), (2, 2, 690)]);
        let b = link(&[(0, 0, 100), (1, 1, 199), (2, 2, 250)]);
        assert_eq!(
            Cube::from_link(&a, 100).unwrap(),
            Cube::from_link(&b, 100).unwrap()
        );
        let c = link(&[(0, 0, 100), (1, 1, 200), (2, 2, 250)]);
        assert_ne!(
            Cube::from_link(&a, 100).unwrap(),
            Cube::from_link(&c, 100).unwrap()
        );
        // tile size 0 keeps only the sequence tuple
        assert_eq!(
            Cube::from_link(&a, 0).unwrap(),
            Cube::from_link(&c, 0).unwrap()
        );
    }

    #[test]
    fn test_has_subcube() {
        let big = Cube::from_link(&link(&[(0, 0, 0), (1, 1, 0), (2, 3, 0), (3, 5, 0)]), 100).unwrap();
        let sub = Cube::from_link(&link(&[(0, 0, 0), (2, 3, 0)]), 100).unwrap();
        let other_seq = Cube::from_link(&link(&[(0, 0, 0), (2, 4, 0)]), 100).unwrap();
        let other_tile = Cube::from_link(&link(&[(0, 0, 0), (2, 3, 200)]), 100).unwrap();
        let other_ref = Cube::from_link(&link(&[(0, 9, 0), (2, 3, 0)]), 100).unwrap();

        assert!(big.has_subcube(&sub));
        assert!(!sub.has_subcube(&big));
        assert!(!big.has_subcube(&big));
        assert!(!big.has_subcube(&other_seq));
        assert!(!big.has_subcube(&other_tile));
        assert!(!big.has_subcube(&other_ref));
        assert_eq!(big.pair(2), Some(sub));
        assert_eq!(big.pair(0), None);
        assert_eq!(big.pair(4), None);
    }

    #[test]
    fn test_neighbours() {
        let c = Cube::from_link(&link(&[(0, 0, 0), (1, 1, 0), (2, 2, 150)]), 100).unwrap();
        let n = c.neighbours().unwrap();
        assert_eq!(n.len(), 9);
        assert!(n.contains(&c));
        assert!(n.iter().all(|x| x.reference() == c.reference()));
        assert_eq!(n.iter().unique().count(), 9);
        let far = n
            .iter()
            .map(|x| (x.tile(1).distance(), x.tile(2).distance()))
            .min()
            .unwrap();
        assert_eq!(far, (-1, 0));
    }

    #[test]
    fn test_geo_properties() {
        let mut lengths = SequenceLengths::default();
        lengths.insert(0, 1000);
        lengths.insert(1, 800);
        lengths.insert(2, 1000);

        let c = Cube::from_link(&link(&[(0, 0, 0), (1, 1, 0)]), 100).unwrap();
        let g = c.geo_properties(100, 0, &lengths).unwrap();
        assert_eq!(g, GeoProperties { length: 800, min_chunk: 0, max_chunk: 0 });

        // genome 1 tile starts 200 before the reference tile
        let c = Cube::from_link(&link(&[(0, 0, 500), (1, 1, 300)]), 100).unwrap();
        let g = c.geo_properties(100, 0, &lengths).unwrap();
        assert_eq!(g.length, 800);

        let c = Cube::from_link(&link(&[(0, 0, 0), (2, 2, 0)]), 100).unwrap();
        let g = c.geo_properties(100, 500, &lengths).unwrap();
        assert_eq!(g.length, 1000);
        assert_eq!(g.min_chunk, 0);
        // tip of genome 2 is 1098, clipped to the sequence end
        assert_eq!(g.max_chunk, (999 + 999) / 500);

        let unknown = Cube::from_link(&link(&[(0, 0, 0), (1, 7, 0)]), 100).unwrap();
        assert!(matches!(
            unknown.geo_properties(100, 0, &lengths),
            Err(GhError::UnknownSequenceLength { sequence: 7, ref cube }) if cube == "0:0:0:+,1:7:0:+"
        ));
    }
}
