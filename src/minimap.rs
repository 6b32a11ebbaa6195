//! One pixel per tile overview of a map, plus the geometry a minimap widget
//! needs to show and move the viewport.

use std::{collections::HashMap, path::Path};

use glam::UVec2;
use image::{ImageBuffer, RgbaImage};

use crate::{
    error::Result,
    map::{Grid, TileMap, TileRect},
    terrain::{tile_buffer_len, Palette, TerrainSource},
    TileIndex, TilesetId, TILE_PX, VARIANTS_PER_GROUP,
};

/// Pixel of a mega-tile that stands in for the whole tile
const SAMPLE: UVec2 = UVec2::new(16, 16);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minimap {
    size: Grid,
    indices: Vec<u8>,
    palette: Palette,
}

impl Minimap {
    pub fn render<S: TerrainSource + ?Sized>(map: &TileMap, source: &S) -> Self {
        let tileset = map.tileset();
        let mut scratch = vec![0u8; tile_buffer_len()];
        let mut sampled: HashMap<TileIndex, u8> = HashMap::new();
        let indices = map
            .tiles()
            .iter()
            .map(|&tile| {
                *sampled
                    .entry(tile)
                    .or_insert_with(|| sample_tile(source, tileset, tile, &mut scratch))
            })
            .collect();
        log::trace!("minimap sampled {} distinct tiles", sampled.len());
        let palette = source.palette(tileset).cloned().unwrap_or_default();
        return Self {
            size: map.dims(),
            indices,
            palette,
        };
    }

    pub fn width(&self) -> u32 {
        return self.size.x;
    }

    pub fn height(&self) -> u32 {
        return self.size.y;
    }

    pub fn indices(&self) -> &[u8] {
        return &self.indices;
    }

    pub fn palette(&self) -> &Palette {
        return &self.palette;
    }

    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        return self.size.index(UVec2::new(x, y)).map(|idx| self.indices[idx]);
    }

    pub fn to_rgba(&self) -> RgbaImage {
        return ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            self.palette.rgba(self.indices[(y * self.width() + x) as usize])
        });
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgba().save(path)?;
        return Ok(());
    }
}

fn sample_tile<S: TerrainSource + ?Sized>(
    source: &S,
    tileset: TilesetId,
    tile: TileIndex,
    scratch: &mut [u8],
) -> u8 {
    let group = tile / VARIANTS_PER_GROUP as TileIndex;
    let variant = tile as usize % VARIANTS_PER_GROUP;
    let mega_tile = source
        .mega_tile_indices(tileset, group)
        .map(|table| table[variant])
        .unwrap_or(0);
    scratch.fill(0);
    source.draw_tile(tileset, mega_tile, scratch, TILE_PX as usize);
    return scratch[(SAMPLE.y * TILE_PX + SAMPLE.x) as usize];
}

/// Tiles covered by a view at `screen_pos` (pixels) showing `view_size` pixels
pub fn viewport_box(screen_pos: UVec2, view_size: UVec2) -> TileRect {
    let min = screen_pos / TILE_PX;
    let tiles = |px: u32| px / TILE_PX + u32::from(px % TILE_PX != 0);
    return TileRect::new(min.x, min.y, tiles(view_size.x), tiles(view_size.y));
}

/// Scale that fits a minimap of `minimap` tiles into `widget` pixels
/// keeping its aspect ratio
pub fn fit_scale(widget: UVec2, minimap: Grid) -> f64 {
    if minimap.x == 0 || minimap.y == 0 {
        return 1.0;
    }
    let sx = widget.x as f64 / minimap.x as f64;
    let sy = widget.y as f64 / minimap.y as f64;
    return sx.min(sy);
}

/// Tile under a click at widget pixel `(x, y)` on a minimap drawn at `scale`
pub fn click_to_tile(x: i32, y: i32, scale: f64) -> UVec2 {
    if scale <= 0.0 {
        return UVec2::ZERO;
    }
    let to_tile = |v: i32| (v.max(0) as f64 / scale) as u32;
    return UVec2::new(to_tile(x), to_tile(y));
}
