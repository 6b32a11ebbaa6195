pub mod config;
pub mod context;
pub mod error;
pub mod icon;
pub mod map;
pub mod minimap;
pub mod selector;
pub mod terrain;
pub mod tileset;

pub use context::{MapContext, ViewId};
pub use error::{Error, Result};
pub use map::{Grid, TileMap, TileRect};
pub use terrain::{Palette, TerrainLibrary, TerrainSource, TilesetGraphics};
pub use tileset::{Catalog, TileGroup, Tileset};

/// Width and height of a mega-tile in pixels
pub const TILE_PX: u32 = 32;

/// Number of tile variants addressable by one tile group
pub const VARIANTS_PER_GROUP: usize = 16;

/// Index into the engine's tileset numbering (position in the catalog)
pub type TilesetId = usize;

/// Index into a tileset's CV5 table
pub type TileGroupId = u16;

/// Value stored in a map cell: `group * 16 + variant`
pub type TileIndex = u16;

/// Index into a tileset's VX4 table
pub type MegaTileId = u16;
