//! The eight terrain tilesets and the brushes each offers.

use std::sync::{Arc, OnceLock};

use rand::Rng;

use crate::{
    error::{Error, Result},
    icon::{IconCell, TileIcon},
    selector,
    terrain::TerrainSource,
    TileGroupId, TileIndex, TilesetId,
};

pub const CATALOG_SIZE: usize = 8;

pub const BADLANDS: TilesetId = 0;
pub const SPACE: TilesetId = 1;
pub const INSTALLATION: TilesetId = 2;
pub const ASHWORLD: TilesetId = 3;
pub const JUNGLE: TilesetId = 4;
pub const DESERT: TilesetId = 5;
pub const ICE: TilesetId = 6;
pub const TWILIGHT: TilesetId = 7;

type BrushList = &'static [(TileGroupId, &'static str)];

const BADLANDS_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (2, "Dirt"),
    (20, "Mud"),
    (4, "High Dirt"),
    (6, "Water"),
    (8, "Grass"),
    (10, "High Grass"),
    (18, "Structure"),
    (16, "Asphalt"),
    (12, "Rocky Ground"),
];

const SPACE_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (2, "Space"),
    (14, "Low Platform"),
    (18, "Rusty Pit"),
    (4, "Platform"),
    (16, "Dark Platform"),
    (6, "Plating"),
    (12, "Solar Array"),
    (8, "High Platform"),
    (10, "High Plating"),
    (20, "Elevated Catwalk"),
];

// no creep on installation
const INSTALLATION_BRUSHES: BrushList = &[
    (0, "Null"),
    (2, "Substructure"),
    (4, "Substructure Plating"),
    (6, "Floor"),
    (8, "Roof"),
    (10, "Plating"),
    (12, "Bottomless Pit"),
    (14, "Substructure Panels"),
    (16, "Buildable Substructure"),
];

const ASHWORLD_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (14, "Magma"),
    (2, "Dirt"),
    (4, "Lava"),
    (10, "Shale"),
    (16, "Broken Rock"),
    (6, "High Dirt"),
    (8, "High Lava"),
    (12, "High Shale"),
];

const JUNGLE_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (6, "Water"),
    (2, "Dirt"),
    (26, "Mud"),
    (8, "Jungle"),
    (10, "Rocky Ground"),
    (14, "Ruins"),
    (12, "Raised Jungle"),
    (16, "Temple"),
    (4, "High Dirt"),
    (18, "High Jungle"),
    (20, "High Ruins"),
    (22, "High Raised Jungle"),
    (24, "High Temple"),
];

const DESERT_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (6, "Tar"),
    (2, "Dirt"),
    (26, "Dried Mud"),
    (8, "Sand Dunes"),
    (10, "Rocky Ground"),
    (14, "Crags"),
    (12, "Sandy Sunken Pit"),
    (16, "Compound"),
    (4, "High Dirt"),
    (18, "High Sand Dunes"),
    (20, "High Crags"),
    (22, "High Sandy Sunken Pit"),
    (24, "High Compound"),
];

const ICE_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (6, "Ice"),
    (2, "Snow"),
    (26, "Moguls"),
    (8, "Dirt"),
    (10, "Rocky Snow"),
    (14, "Grass"),
    (12, "Water"),
    (16, "Outpost"),
    (4, "High Snow"),
    (18, "High Dirt"),
    (20, "High Grass"),
    (22, "High Water"),
    (24, "High Outpost"),
];

const TWILIGHT_BRUSHES: BrushList = &[
    (0, "Null"),
    (1, "Creep"),
    (6, "Water"),
    (2, "Dirt"),
    (26, "Mud"),
    (8, "Crushed Rock"),
    (10, "Crevices"),
    (14, "Flagstones"),
    (12, "Sunken Ground"),
    (16, "Basilica"),
    (4, "High Dirt"),
    (18, "High Crushed Rock"),
    (20, "High Flagstones"),
    (22, "High Sunken Ground"),
    (24, "High Basilica"),
];

/// A terrain brush. `(tileset_id, group_id)` keys the tileset's CV5 table.
#[derive(Debug)]
pub struct TileGroup {
    tileset_id: TilesetId,
    group_id: TileGroupId,
    name: &'static str,
    icon: IconCell,
}

impl TileGroup {
    pub fn new(tileset_id: TilesetId, group_id: TileGroupId, name: &'static str) -> Self {
        return Self {
            tileset_id,
            group_id,
            name,
            icon: IconCell::new(),
        };
    }

    pub fn tileset_id(&self) -> TilesetId {
        return self.tileset_id;
    }

    pub fn group_id(&self) -> TileGroupId {
        return self.group_id;
    }

    pub fn name(&self) -> &'static str {
        return self.name;
    }

    /// Preview of the group's first variant, rendered on first use.
    /// Later calls return the cached icon whatever `source` they pass.
    pub fn icon<S: TerrainSource + ?Sized>(&self, source: &S) -> Arc<TileIcon> {
        return self.icon.get_or_render(|| {
            let mega_tile = match source.mega_tile_indices(self.tileset_id, self.group_id) {
                Some(table) => table[0],
                None => {
                    log::warn!(
                        "no terrain entry for tileset {} group {}",
                        self.tileset_id,
                        self.group_id
                    );
                    0
                }
            };
            log::debug!("rendering icon for {:?} from mega-tile {mega_tile}", self.name);
            TileIcon::render(source, self.tileset_id, mega_tile)
        });
    }

    pub fn is_icon_cached(&self) -> bool {
        return self.icon.is_cached();
    }
}

#[derive(Debug)]
pub struct Tileset {
    id: TilesetId,
    name: &'static str,
    brushes: Vec<TileGroup>,
    default_brush_index: usize,
}

impl Tileset {
    fn new(id: TilesetId, name: &'static str, brushes: BrushList, default_brush_index: usize) -> Self {
        debug_assert!(default_brush_index < brushes.len());
        let brushes = brushes
            .iter()
            .map(|&(group_id, brush_name)| TileGroup::new(id, group_id, brush_name))
            .collect();
        return Self {
            id,
            name,
            brushes,
            default_brush_index,
        };
    }

    pub fn id(&self) -> TilesetId {
        return self.id;
    }

    pub fn name(&self) -> &'static str {
        return self.name;
    }

    pub fn brushes(&self) -> &[TileGroup] {
        return &self.brushes;
    }

    pub fn default_brush_index(&self) -> usize {
        return self.default_brush_index;
    }

    pub fn default_brush(&self) -> &TileGroup {
        return &self.brushes[self.default_brush_index];
    }

    pub fn brush(&self, index: usize) -> Result<&TileGroup> {
        return self.brushes.get(index).ok_or(Error::BrushOutOfRange {
            tileset: self.id,
            index,
            len: self.brushes.len(),
        });
    }

    pub fn find_brush(&self, group_id: TileGroupId) -> Option<&TileGroup> {
        return self.brushes.iter().find(|brush| brush.group_id == group_id);
    }

    /// Picks the tile to paint for `group` on this tileset
    pub fn random_tile<S: TerrainSource + ?Sized>(
        &self,
        source: &S,
        group: TileGroupId,
        clutter: i32,
        rng: &mut impl Rng,
    ) -> TileIndex {
        let table = source.mega_tile_indices(self.id, group);
        return selector::random_tile(table, group, clutter, rng);
    }
}

/// All tilesets, positioned by their id
#[derive(Debug)]
pub struct Catalog {
    tilesets: [Tileset; CATALOG_SIZE],
}

impl Catalog {
    pub fn standard() -> Self {
        return Self {
            tilesets: [
                Tileset::new(BADLANDS, "Badlands", BADLANDS_BRUSHES, 2),
                Tileset::new(SPACE, "Space", SPACE_BRUSHES, 5),
                Tileset::new(INSTALLATION, "Installation", INSTALLATION_BRUSHES, 3),
                Tileset::new(ASHWORLD, "Ashworld", ASHWORLD_BRUSHES, 3),
                Tileset::new(JUNGLE, "Jungle", JUNGLE_BRUSHES, 5),
                Tileset::new(DESERT, "Desert", DESERT_BRUSHES, 5),
                Tileset::new(ICE, "Ice", ICE_BRUSHES, 3),
                Tileset::new(TWILIGHT, "Twilight", TWILIGHT_BRUSHES, 3),
            ],
        };
    }

    /// The process-wide catalog, built on first use
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        return CATALOG.get_or_init(Catalog::standard);
    }

    pub fn tilesets(&self) -> &[Tileset] {
        return &self.tilesets;
    }

    pub fn len(&self) -> usize {
        return self.tilesets.len();
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: TilesetId) -> Option<&Tileset> {
        return self.tilesets.get(id);
    }

    pub fn from_id(&self, id: i64) -> Result<&Tileset> {
        return usize::try_from(id)
            .ok()
            .and_then(|index| self.get(index))
            .ok_or(Error::TilesetOutOfRange(id, self.len()));
    }
}
