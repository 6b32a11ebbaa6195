//! The open document and the views showing it.
//!
//! Views never edit the map themselves. They call the editing operations here
//! and repaint whatever [`MapContext::update`] reports as damaged.

use std::collections::BTreeSet;

use derive_more::From;
use glam::UVec2;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    error::{Error, Result},
    map::{TileMap, TileRect},
    selector::MAX_GROUP,
    terrain::TerrainSource,
    tileset::Catalog,
    TileGroupId, TilesetId, TILE_PX,
};

/// Player slots a unit can belong to, neutral included
pub const PLAYER_SLOTS: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
pub struct ViewId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPlacement {
    pub unit_type: u16,
    pub owner: u8,
    /// Pixel position on the map
    pub position: UVec2,
}

pub struct MapContext<'c, T> {
    catalog: &'c Catalog,
    terrain: T,
    rng: StdRng,
    map: Option<TileMap>,
    units: Vec<UnitPlacement>,
    views: BTreeSet<ViewId>,
    next_view: u32,
    damage: Vec<TileRect>,
}

impl<'c, T: TerrainSource> MapContext<'c, T> {
    /// `seed` makes every brush stroke reproducible
    pub fn new(catalog: &'c Catalog, terrain: T, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return Self {
            catalog,
            terrain,
            rng,
            map: None,
            units: Vec::new(),
            views: BTreeSet::new(),
            next_view: 0,
            damage: Vec::new(),
        };
    }

    pub fn catalog(&self) -> &'c Catalog {
        return self.catalog;
    }

    pub fn terrain(&self) -> &T {
        return &self.terrain;
    }

    pub fn map(&self) -> Option<&TileMap> {
        return self.map.as_ref();
    }

    pub fn units(&self) -> &[UnitPlacement] {
        return &self.units;
    }

    /// Closes the document. Attached views stay attached.
    pub fn reset(&mut self) {
        self.map = None;
        self.units.clear();
        self.damage.clear();
        log::debug!("map context reset");
    }

    /// Takes the regions edited since the last call
    pub fn update(&mut self) -> Vec<TileRect> {
        return std::mem::take(&mut self.damage);
    }

    pub fn new_map(
        &mut self,
        tile_width: u32,
        tile_height: u32,
        tileset: TilesetId,
        brush: usize,
        clutter: i32,
    ) -> Result<()> {
        let group = self.catalog.from_id(tileset as i64)?.brush(brush)?.group_id();
        let map = TileMap::new(tileset, tile_width, tile_height)?;
        let bounds = map.bounds();
        self.reset();
        self.map = Some(map);
        self.apply_brush(bounds, group, clutter)?;
        log::info!(
            "new {tile_width}x{tile_height} map on {} filled with {}",
            self.catalog.tilesets()[tileset].name(),
            self.catalog.tilesets()[tileset].brushes()[brush].name()
        );
        return Ok(());
    }

    pub fn add_view(&mut self) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        self.views.insert(id);
        log::debug!("attached view {}", id.0);
        return id;
    }

    pub fn remove_view(&mut self, view: ViewId) -> Result<()> {
        if !self.views.remove(&view) {
            return Err(Error::UnknownView(view.0));
        }
        log::debug!("detached view {}", view.0);
        return Ok(());
    }

    pub fn has_one_view(&self) -> bool {
        return self.views.len() == 1;
    }

    pub fn view_count(&self) -> usize {
        return self.views.len();
    }

    pub fn views(&self) -> impl Iterator<Item = ViewId> + '_ {
        return self.views.iter().copied();
    }

    /// Map size in pixels
    pub fn map_dimensions(&self) -> Result<UVec2> {
        return self.open_map().map(TileMap::pixel_size);
    }

    pub fn tile_width(&self) -> Result<u32> {
        return self.open_map().map(TileMap::width);
    }

    pub fn tile_height(&self) -> Result<u32> {
        return self.open_map().map(TileMap::height);
    }

    pub fn place_unit(&mut self, unit_type: u16, owner: u8, x: u32, y: u32) -> Result<()> {
        let map = self.open_map()?;
        if owner >= PLAYER_SLOTS {
            return Err(Error::InvalidOwner(owner));
        }
        let size = map.pixel_size();
        if x >= size.x || y >= size.y {
            return Err(Error::UnitOutOfBounds(x, y));
        }
        self.units.push(UnitPlacement {
            unit_type,
            owner,
            position: UVec2::new(x, y),
        });
        self.damage.push(TileRect::new(x / TILE_PX, y / TILE_PX, 1, 1));
        log::debug!("placed unit {unit_type} for player {owner} at ({x}, {y})");
        return Ok(());
    }

    /// Paints `tile_group` over `rect`, clipped to the map
    pub fn apply_brush(&mut self, rect: TileRect, tile_group: TileGroupId, clutter: i32) -> Result<()> {
        let map = self.map.as_mut().ok_or(Error::NoMap)?;
        if tile_group > MAX_GROUP {
            return Err(Error::InvalidGroup(tile_group));
        }
        let tileset = self.catalog.from_id(map.tileset() as i64)?;
        let rect = rect.clamp_to(map.dims());
        if rect.is_empty() {
            return Ok(());
        }
        for loc in rect.iter_locs() {
            let tile = tileset.random_tile(&self.terrain, tile_group, clutter, &mut self.rng);
            map.set(loc, tile);
        }
        log::debug!(
            "brushed group {tile_group} at clutter {clutter} over {}x{} tiles from {}",
            rect.width(),
            rect.height(),
            rect.min
        );
        self.damage.push(rect);
        return Ok(());
    }

    fn open_map(&self) -> Result<&TileMap> {
        return self.map.as_ref().ok_or(Error::NoMap);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        terrain::{fixtures, TerrainLibrary},
        tileset::JUNGLE,
    };

    fn jungle_terrain() -> TerrainLibrary {
        let mut tables = vec![fixtures::table(&[]); 27];
        // dirt: three plain, two cluttered
        tables[2] = fixtures::table(&[5, 6, 7, 0, 9, 10]);
        // water: one plain
        tables[6] = fixtures::table(&[3]);
        TerrainLibrary::new().with(JUNGLE, fixtures::solid_graphics(tables, 11))
    }

    fn context(catalog: &Catalog) -> MapContext<'_, TerrainLibrary> {
        MapContext::new(catalog, jungle_terrain(), Some(42))
    }

    #[test]
    fn new_map_fills_with_brush() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        // brush 3 on jungle is dirt
        ctx.new_map(16, 12, JUNGLE, 3, 0).unwrap();
        let map = ctx.map().unwrap();
        assert_eq!(map.tileset(), JUNGLE);
        assert!(map.tiles().iter().all(|t| (32..35).contains(t)));
        assert_eq!(ctx.tile_width().unwrap(), 16);
        assert_eq!(ctx.tile_height().unwrap(), 12);
        assert_eq!(ctx.map_dimensions().unwrap(), UVec2::new(512, 384));
        assert_eq!(ctx.update(), vec![TileRect::new(0, 0, 16, 12)]);
        assert!(ctx.update().is_empty());
    }

    #[test]
    fn new_map_validates_inputs() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        assert!(matches!(ctx.new_map(8, 8, 9, 0, 0), Err(Error::TilesetOutOfRange(9, 8))));
        assert!(matches!(
            ctx.new_map(8, 8, JUNGLE, 40, 0),
            Err(Error::BrushOutOfRange { index: 40, .. })
        ));
        assert!(matches!(ctx.new_map(0, 8, JUNGLE, 0, 0), Err(Error::InvalidDimensions(0, 8))));
        assert!(ctx.map().is_none());
    }

    #[test]
    fn apply_brush_clips_to_map() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        ctx.new_map(8, 8, JUNGLE, 3, 0).unwrap();
        ctx.update();
        ctx.apply_brush(TileRect::new(6, 6, 10, 10), 6, 0).unwrap();
        assert_eq!(ctx.update(), vec![TileRect::new(6, 6, 2, 2)]);
        let map = ctx.map().unwrap();
        for loc in map.dims().iter_locs() {
            let tile = map.get(loc).unwrap();
            if loc.x >= 6 && loc.y >= 6 {
                assert_eq!(tile, 96);
            } else {
                assert!((32..35).contains(&tile));
            }
        }
    }

    #[test]
    fn apply_brush_outside_map_is_noop() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        ctx.new_map(4, 4, JUNGLE, 3, 0).unwrap();
        let before = ctx.map().unwrap().clone();
        ctx.update();
        ctx.apply_brush(TileRect::new(10, 0, 3, 3), 6, 0).unwrap();
        assert!(ctx.update().is_empty());
        assert_eq!(ctx.map().unwrap(), &before);
    }

    #[test]
    fn apply_brush_with_full_clutter() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        ctx.new_map(10, 10, JUNGLE, 3, 100).unwrap();
        assert!(ctx.map().unwrap().tiles().iter().all(|t| [36, 37].contains(t)));
    }

    #[test]
    fn apply_brush_rejects_groups_past_tile_range() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        ctx.new_map(2, 2, JUNGLE, 3, 0).unwrap();
        let before = ctx.map().unwrap().clone();
        ctx.update();
        assert!(matches!(
            ctx.apply_brush(TileRect::new(0, 0, 2, 2), 4097, 0),
            Err(Error::InvalidGroup(4097))
        ));
        assert!(ctx.update().is_empty());
        assert_eq!(ctx.map().unwrap(), &before);

        ctx.apply_brush(TileRect::new(0, 0, 2, 2), MAX_GROUP, 0).unwrap();
        let band = MAX_GROUP as u32 * 16..MAX_GROUP as u32 * 16 + 16;
        assert!(ctx.map().unwrap().tiles().iter().all(|&t| band.contains(&(t as u32))));
    }

    #[test]
    fn editing_needs_a_map() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        assert!(matches!(ctx.apply_brush(TileRect::new(0, 0, 1, 1), 2, 0), Err(Error::NoMap)));
        assert!(matches!(ctx.place_unit(0, 0, 0, 0), Err(Error::NoMap)));
        assert!(matches!(ctx.tile_width(), Err(Error::NoMap)));
        assert!(matches!(ctx.map_dimensions(), Err(Error::NoMap)));
    }

    #[test]
    fn place_unit_checks_owner_and_bounds() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        ctx.new_map(4, 4, JUNGLE, 3, 0).unwrap();
        ctx.update();
        ctx.place_unit(7, 11, 100, 40).unwrap();
        assert_eq!(
            ctx.units(),
            [UnitPlacement {
                unit_type: 7,
                owner: 11,
                position: UVec2::new(100, 40)
            }]
        );
        assert_eq!(ctx.update(), vec![TileRect::new(3, 1, 1, 1)]);
        assert!(matches!(ctx.place_unit(7, 12, 0, 0), Err(Error::InvalidOwner(12))));
        assert!(matches!(ctx.place_unit(7, 0, 128, 0), Err(Error::UnitOutOfBounds(128, 0))));
        assert_eq!(ctx.units().len(), 1);
    }

    #[test]
    fn views_attach_and_detach() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        assert!(!ctx.has_one_view());
        let first = ctx.add_view();
        assert!(ctx.has_one_view());
        let second = ctx.add_view();
        assert_ne!(first, second);
        assert_eq!(ctx.views().collect::<Vec<_>>(), vec![first, second]);
        ctx.remove_view(first).unwrap();
        assert!(ctx.has_one_view());
        assert!(matches!(ctx.remove_view(first), Err(Error::UnknownView(0))));
        ctx.reset();
        assert_eq!(ctx.view_count(), 1);
    }

    #[test]
    fn reset_closes_document() {
        let catalog = Catalog::standard();
        let mut ctx = context(&catalog);
        ctx.new_map(4, 4, JUNGLE, 3, 0).unwrap();
        ctx.place_unit(0, 0, 0, 0).unwrap();
        ctx.reset();
        assert!(ctx.map().is_none());
        assert!(ctx.units().is_empty());
        assert!(ctx.update().is_empty());
    }

    #[test]
    fn seeded_contexts_paint_alike() {
        let catalog = Catalog::standard();
        let paint = || {
            let mut ctx = context(&catalog);
            ctx.new_map(32, 32, JUNGLE, 3, 30).unwrap();
            ctx.map().unwrap().clone()
        };
        assert_eq!(paint(), paint());
    }
}
