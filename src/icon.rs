use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use image::{ImageBuffer, RgbaImage};

use crate::{
    error::Result,
    terrain::{tile_buffer_len, Palette, TerrainSource},
    MegaTileId, TilesetId, TILE_PX,
};

/// A 32x32 palette-indexed preview of a brush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileIcon {
    pixels: Vec<u8>,
    palette: Palette,
}

impl TileIcon {
    /// Draws `mega_tile` with the tileset's palette. A tileset without a
    /// palette renders black.
    pub fn render<S: TerrainSource + ?Sized>(
        source: &S,
        tileset: TilesetId,
        mega_tile: MegaTileId,
    ) -> Self {
        let palette = match source.palette(tileset) {
            Some(palette) => palette.clone(),
            None => {
                log::warn!("no palette for tileset {tileset}");
                Palette::default()
            }
        };
        let mut pixels = vec![0u8; tile_buffer_len()];
        source.draw_tile(tileset, mega_tile, &mut pixels, TILE_PX as usize);
        return Self { pixels, palette };
    }

    pub fn pixels(&self) -> &[u8] {
        return &self.pixels;
    }

    pub fn palette(&self) -> &Palette {
        return &self.palette;
    }

    /// Palette index at `(x, y)`, `None` outside the 32x32 tile
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= TILE_PX || y >= TILE_PX {
            return None;
        }
        return Some(self.pixels[(y * TILE_PX + x) as usize]);
    }

    pub fn to_rgba(&self) -> RgbaImage {
        return ImageBuffer::from_fn(TILE_PX, TILE_PX, |x, y| {
            self.palette.rgba(self.pixels[(y * TILE_PX + x) as usize])
        });
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgba().save(path)?;
        return Ok(());
    }
}

/// Holds a tile group's icon once it has been rendered.
/// Rendering happens at most once even with concurrent callers.
#[derive(Debug, Default)]
pub struct IconCell(OnceLock<Arc<TileIcon>>);

impl IconCell {
    pub fn new() -> Self {
        return Self::default();
    }

    pub fn is_cached(&self) -> bool {
        return self.0.get().is_some();
    }

    pub fn get(&self) -> Option<Arc<TileIcon>> {
        return self.0.get().cloned();
    }

    pub fn get_or_render(&self, render: impl FnOnce() -> TileIcon) -> Arc<TileIcon> {
        return Arc::clone(self.0.get_or_init(|| Arc::new(render())));
    }
}
