use derive_more::{Deref, DerefMut, From};
use glam::UVec2;

use crate::{
    error::{Error, Result},
    TileIndex, TilesetId, TILE_PX,
};

/// Largest map side, in tiles
pub const MAX_DIMENSION: u32 = 256;

/// Size of a map in tiles
#[derive(Deref, DerefMut, From, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Grid(pub UVec2);

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        return Self(UVec2::new(width, height));
    }

    pub fn area(&self) -> u32 {
        return self.x * self.y;
    }

    pub fn contains(&self, loc: UVec2) -> bool {
        return loc.x < self.x && loc.y < self.y;
    }

    /// Row major index of `loc`
    pub fn index(&self, loc: UVec2) -> Option<usize> {
        if !self.contains(loc) {
            return None;
        }
        return Some((loc.y * self.x + loc.x) as usize);
    }

    pub fn iter_locs(&self) -> UVec2Iter {
        return UVec2Iter::new(UVec2::ZERO, self.0);
    }
}

/// Walks every location in `[start, end)` row by row
#[derive(Clone, Debug)]
pub struct UVec2Iter {
    start_x: u32,
    cur: UVec2,
    end: UVec2,
}

impl UVec2Iter {
    pub fn new(start: UVec2, end: UVec2) -> Self {
        return Self {
            start_x: start.x,
            cur: start,
            end,
        };
    }
}

impl Iterator for UVec2Iter {
    type Item = UVec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start_x >= self.end.x {
            return None;
        }
        if self.cur.x >= self.end.x {
            self.cur.x = self.start_x;
            self.cur.y += 1;
        }
        if self.cur.y >= self.end.y {
            return None;
        }
        let ret = self.cur;
        self.cur.x += 1;
        return Some(ret);
    }
}

/// A rectangle of tiles, `max` exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileRect {
    pub min: UVec2,
    pub max: UVec2,
}

impl TileRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        return Self {
            min: UVec2::new(x, y),
            max: UVec2::new(x.saturating_add(width), y.saturating_add(height)),
        };
    }

    pub fn width(&self) -> u32 {
        return self.max.x.saturating_sub(self.min.x);
    }

    pub fn height(&self) -> u32 {
        return self.max.y.saturating_sub(self.min.y);
    }

    pub fn is_empty(&self) -> bool {
        return self.width() == 0 || self.height() == 0;
    }

    /// The part of this rectangle inside `grid`
    pub fn clamp_to(&self, grid: Grid) -> Self {
        let max = self.max.min(grid.0);
        return Self {
            min: self.min.min(max),
            max,
        };
    }

    pub fn iter_locs(&self) -> UVec2Iter {
        if self.is_empty() {
            return UVec2Iter::new(self.min, self.min);
        }
        return UVec2Iter::new(self.min, self.max);
    }
}

/// Terrain of a map: one tile index per cell, row major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    dims: Grid,
    tileset: TilesetId,
    tiles: Vec<TileIndex>,
}

impl TileMap {
    pub fn new(tileset: TilesetId, width: u32, height: u32) -> Result<Self> {
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(Error::InvalidDimensions(width, height));
        }
        let dims = Grid::new(width, height);
        return Ok(Self {
            dims,
            tileset,
            tiles: vec![0; dims.area() as usize],
        });
    }

    pub fn width(&self) -> u32 {
        return self.dims.x;
    }

    pub fn height(&self) -> u32 {
        return self.dims.y;
    }

    pub fn dims(&self) -> Grid {
        return self.dims;
    }

    pub fn tileset(&self) -> TilesetId {
        return self.tileset;
    }

    pub fn tiles(&self) -> &[TileIndex] {
        return &self.tiles;
    }

    pub fn bounds(&self) -> TileRect {
        return TileRect {
            min: UVec2::ZERO,
            max: self.dims.0,
        };
    }

    pub fn pixel_size(&self) -> UVec2 {
        return self.dims.0 * TILE_PX;
    }

    pub fn get(&self, loc: UVec2) -> Option<TileIndex> {
        return self.dims.index(loc).map(|idx| self.tiles[idx]);
    }

    /// Returns false when `loc` is outside the map
    pub fn set(&mut self, loc: UVec2, tile: TileIndex) -> bool {
        match self.dims.index(loc) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iter_locs_row_major() {
        let locs: Vec<UVec2> = TileRect::new(1, 2, 2, 2).iter_locs().collect();
        assert_eq!(
            locs,
            [
                UVec2::new(1, 2),
                UVec2::new(2, 2),
                UVec2::new(1, 3),
                UVec2::new(2, 3)
            ]
        );
        assert_eq!(Grid::new(3, 4).iter_locs().count(), 12);
    }

    #[test]
    fn empty_rects_yield_nothing() {
        assert_eq!(TileRect::new(4, 4, 0, 3).iter_locs().count(), 0);
        assert_eq!(TileRect::new(4, 4, 3, 0).iter_locs().count(), 0);
        assert!(TileRect::default().is_empty());
    }

    #[test]
    fn clamp_to_grid() {
        let grid = Grid::new(10, 8);
        assert_eq!(
            TileRect::new(6, 5, 10, 10).clamp_to(grid),
            TileRect::new(6, 5, 4, 3)
        );
        assert!(TileRect::new(12, 2, 3, 3).clamp_to(grid).is_empty());
        assert_eq!(TileRect::new(2, 2, 3, 3).clamp_to(grid), TileRect::new(2, 2, 3, 3));
    }

    #[test]
    fn rect_does_not_overflow() {
        let rect = TileRect::new(u32::MAX - 1, 0, 10, 1);
        assert_eq!(rect.max.x, u32::MAX);
        assert_eq!(rect.width(), 1);
    }

    #[test]
    fn map_get_set() {
        let mut map = TileMap::new(3, 4, 2).unwrap();
        assert_eq!(map.tiles().len(), 8);
        assert!(map.set(UVec2::new(3, 1), 0x25));
        assert_eq!(map.get(UVec2::new(3, 1)), Some(0x25));
        assert_eq!(map.tiles()[7], 0x25);
        assert!(!map.set(UVec2::new(4, 0), 1));
        assert_eq!(map.get(UVec2::new(0, 2)), None);
        assert_eq!(map.pixel_size(), UVec2::new(128, 64));
    }

    #[test]
    fn map_dimensions_validated() {
        assert!(matches!(TileMap::new(0, 0, 10), Err(Error::InvalidDimensions(0, 10))));
        assert!(matches!(TileMap::new(0, 257, 10), Err(Error::InvalidDimensions(257, 10))));
        assert!(TileMap::new(0, 256, 256).is_ok());
    }
}
