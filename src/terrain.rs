//! Terrain graphics for the eight tilesets.
//!
//! A tileset is described by four files:
//! - `.cv5` tile groups, each listing up to 16 mega-tile variants
//! - `.vx4` mega-tiles, each a 4x4 grid of minitile references
//! - `.vr4` minitiles, 8x8 palette indices
//! - `.wpe` the 256 color palette
//!
//! Everything that needs terrain data goes through [`TerrainSource`] so the
//! catalog and selector can be driven by tables built in memory.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use derive_more::{Deref, From};
use image::Rgba;

use crate::{
    error::{Error, Result},
    MegaTileId, TileGroupId, TilesetId, TILE_PX, VARIANTS_PER_GROUP,
};

const CV5_RECORD: usize = 52;
const CV5_MEGA_TILES_OFFSET: usize = 20;
const VX4_RECORD: usize = 32;
const VR4_RECORD: usize = 64;
const WPE_LEN: usize = 256 * 4;
const MINITILE_PX: usize = 8;
const MINITILES_PER_ROW: usize = 4;

/// File stems of the tileset graphics, indexed by tileset id
pub const FILE_STEMS: [&str; 8] = [
    "badlands", "platform", "install", "ashworld", "jungle", "desert", "ice", "twilight",
];

/// The mega-tile variants of one tile group. Zero marks an unused slot.
pub type MegaTileTable = [MegaTileId; VARIANTS_PER_GROUP];

/// Data the editor needs from the game's terrain tables
pub trait TerrainSource {
    fn mega_tile_indices(&self, tileset: TilesetId, group: TileGroupId) -> Option<&MegaTileTable>;

    fn palette(&self, tileset: TilesetId) -> Option<&Palette>;

    /// Rasterize one 32x32 mega-tile as palette indices into `dst`,
    /// `pitch` bytes per row.
    fn draw_tile(&self, tileset: TilesetId, mega_tile: MegaTileId, dst: &mut [u8], pitch: usize);
}

#[derive(Deref, From, Clone, PartialEq, Eq)]
pub struct Palette(pub [[u8; 3]; 256]);

impl Palette {
    pub fn from_wpe(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != WPE_LEN {
            return Err(Error::Truncated {
                what: "wpe",
                len: bytes.len(),
                record: WPE_LEN,
            });
        }
        let mut colors = [[0u8; 3]; 256];
        for (color, entry) in colors.iter_mut().zip(bytes.chunks_exact(4)) {
            *color = [entry[0], entry[1], entry[2]];
        }
        return Ok(Palette(colors));
    }

    pub fn rgba(&self, index: u8) -> Rgba<u8> {
        let [r, g, b] = self.0[index as usize];
        return Rgba([r, g, b, 255]);
    }
}

impl Default for Palette {
    fn default() -> Self {
        return Palette([[0; 3]; 256]);
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("first", &self.0[0])
            .field("last", &self.0[255])
            .finish()
    }
}

/// Parsed graphics of a single tileset
#[derive(Debug, Clone, Default)]
pub struct TilesetGraphics {
    groups: Vec<MegaTileTable>,
    mega_tiles: Vec<[u16; 16]>,
    minitiles: Vec<[u8; VR4_RECORD]>,
    palette: Palette,
}

impl TilesetGraphics {
    pub fn new(
        groups: Vec<MegaTileTable>,
        mega_tiles: Vec<[u16; 16]>,
        minitiles: Vec<[u8; VR4_RECORD]>,
        palette: Palette,
    ) -> Self {
        return Self {
            groups,
            mega_tiles,
            minitiles,
            palette,
        };
    }

    pub fn from_bytes(cv5: &[u8], vx4: &[u8], vr4: &[u8], wpe: &[u8]) -> Result<Self> {
        let groups = records(cv5, CV5_RECORD, "cv5")?
            .map(|record| read_u16s(&record[CV5_MEGA_TILES_OFFSET..]))
            .collect();
        let mega_tiles = records(vx4, VX4_RECORD, "vx4")?.map(read_u16s).collect();
        let minitiles = records(vr4, VR4_RECORD, "vr4")?
            .map(|record| {
                let mut pixels = [0u8; VR4_RECORD];
                pixels.copy_from_slice(record);
                pixels
            })
            .collect();
        let palette = Palette::from_wpe(wpe)?;
        return Ok(Self::new(groups, mega_tiles, minitiles, palette));
    }

    /// Reads `<stem>.cv5`, `<stem>.vx4`, `<stem>.vr4` and `<stem>.wpe` from `dir`
    pub fn load(dir: impl AsRef<Path>, stem: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |ext: &str| -> Result<Vec<u8>> {
            let path = dir.join(format!("{stem}.{ext}"));
            fs::read(&path).map_err(|source| Error::Io { path, source })
        };
        let graphics = Self::from_bytes(&read("cv5")?, &read("vx4")?, &read("vr4")?, &read("wpe")?)?;
        log::debug!(
            "loaded {stem}: {} groups, {} mega-tiles, {} minitiles",
            graphics.groups.len(),
            graphics.mega_tiles.len(),
            graphics.minitiles.len()
        );
        return Ok(graphics);
    }

    pub fn group(&self, group: TileGroupId) -> Option<&MegaTileTable> {
        return self.groups.get(group as usize);
    }

    pub fn palette(&self) -> &Palette {
        return &self.palette;
    }

    pub fn draw_tile(&self, mega_tile: MegaTileId, dst: &mut [u8], pitch: usize) {
        let Some(refs) = self.mega_tiles.get(mega_tile as usize) else {
            log::warn!("mega-tile {mega_tile} is out of range ({} loaded)", self.mega_tiles.len());
            return;
        };
        for (slot, &minitile_ref) in refs.iter().enumerate() {
            let image = (minitile_ref >> 1) as usize;
            let flipped = minitile_ref & 1 == 1;
            let Some(pixels) = self.minitiles.get(image) else {
                log::warn!("mega-tile {mega_tile} references missing minitile {image}");
                continue;
            };
            let origin_x = (slot % MINITILES_PER_ROW) * MINITILE_PX;
            let origin_y = (slot / MINITILES_PER_ROW) * MINITILE_PX;
            for y in 0..MINITILE_PX {
                for x in 0..MINITILE_PX {
                    let src_x = if flipped { MINITILE_PX - 1 - x } else { x };
                    let idx = (origin_y + y) * pitch + origin_x + x;
                    if let Some(pixel) = dst.get_mut(idx) {
                        *pixel = pixels[y * MINITILE_PX + src_x];
                    }
                }
            }
        }
    }
}

/// Graphics for every tileset that could be loaded, keyed by tileset id
#[derive(Debug, Clone, Default)]
pub struct TerrainLibrary {
    tilesets: HashMap<TilesetId, TilesetGraphics>,
}

impl TerrainLibrary {
    pub fn new() -> Self {
        return Self::default();
    }

    pub fn insert(&mut self, tileset: TilesetId, graphics: TilesetGraphics) {
        self.tilesets.insert(tileset, graphics);
    }

    pub fn with(mut self, tileset: TilesetId, graphics: TilesetGraphics) -> Self {
        self.insert(tileset, graphics);
        return self;
    }

    pub fn get(&self, tileset: TilesetId) -> Option<&TilesetGraphics> {
        return self.tilesets.get(&tileset);
    }

    pub fn len(&self) -> usize {
        return self.tilesets.len();
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads every tileset in `dir` whose `.cv5` file exists.
    /// Tilesets without files are skipped, broken files are an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut library = Self::new();
        for (id, stem) in FILE_STEMS.iter().enumerate() {
            let cv5: PathBuf = dir.join(format!("{stem}.cv5"));
            if !cv5.exists() {
                log::debug!("no graphics for {stem} in {}", dir.display());
                continue;
            }
            library.insert(id, TilesetGraphics::load(dir, stem)?);
        }
        log::info!("loaded {} tilesets from {}", library.len(), dir.display());
        return Ok(library);
    }
}

impl TerrainSource for TerrainLibrary {
    fn mega_tile_indices(&self, tileset: TilesetId, group: TileGroupId) -> Option<&MegaTileTable> {
        return self.get(tileset).and_then(|graphics| graphics.group(group));
    }

    fn palette(&self, tileset: TilesetId) -> Option<&Palette> {
        return self.get(tileset).map(TilesetGraphics::palette);
    }

    fn draw_tile(&self, tileset: TilesetId, mega_tile: MegaTileId, dst: &mut [u8], pitch: usize) {
        match self.get(tileset) {
            Some(graphics) => graphics.draw_tile(mega_tile, dst, pitch),
            None => log::warn!("no graphics loaded for tileset {tileset}"),
        }
    }
}

/// Bytes in one rendered mega-tile
pub const fn tile_buffer_len() -> usize {
    return (TILE_PX * TILE_PX) as usize;
}

fn records<'a>(
    bytes: &'a [u8],
    record: usize,
    what: &'static str,
) -> Result<std::slice::ChunksExact<'a, u8>> {
    if bytes.len() % record != 0 {
        return Err(Error::Truncated {
            what,
            len: bytes.len(),
            record,
        });
    }
    return Ok(bytes.chunks_exact(record));
}

fn read_u16s(bytes: &[u8]) -> [u16; 16] {
    let mut values = [0u16; 16];
    for (value, pair) in values.iter_mut().zip(bytes.chunks_exact(2)) {
        *value = u16::from_le_bytes([pair[0], pair[1]]);
    }
    return values;
}
