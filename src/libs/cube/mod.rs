pub mod cubeset;
pub mod hasse;
pub mod prefilter;
pub mod record;
pub mod score;
pub mod tile;


pub use cubeset::{CubeId, CubeSet};
pub use hasse::Relation;
pub use prefilter::{PrefilterCubeSet, SequenceCluster};
pub use record::{Cube, GeoProperties};
pub use score::{ScoreKey, SubTiling};
pub use tile::{TileDistance, MAX_TILE_DISTANCE};
