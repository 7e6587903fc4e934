//! Sparse, lazily generated tile store.

mod generator;
mod tile;

use std::collections::HashMap;

pub use generator::{roll_resources, TerrainGenerator};
pub use tile::{Resources, Tile, TileCoord};

use crate::economy::{BuildError, StructureType};

#[derive(Debug)]
pub struct World {
    generator: TerrainGenerator,
    tiles: HashMap<TileCoord, Tile>,
}

impl World {
    pub fn new(seed: i32) -> Self {
        Self {
            generator: TerrainGenerator::new(seed),
            tiles: HashMap::new(),
        }
    }

    pub fn seed(&self) -> i32 {
        self.generator.seed()
    }

    /// Tile at `(x, y)`, generated and cached on first access.
    pub fn get(&mut self, x: i32, y: i32) -> &Tile {
        self.tile_mut(x, y)
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        let generator = &self.generator;
        self.tiles
            .entry(TileCoord::new(x, y))
            .or_insert_with(|| generator.generate(x, y))
    }

    /// Cached tile, without generating.
    pub fn peek(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tiles.get(&TileCoord::new(x, y))
    }

    /// `size` x `size` square centred on `(cx, cy)`, row-major from the top-left.
    pub fn region(&mut self, cx: i32, cy: i32, size: u32) -> Vec<&Tile> {
        let coords = region_coords(cx, cy, size);
        for coord in &coords {
            self.tile_mut(coord.x, coord.y);
        }
        coords
            .iter()
            .filter_map(|coord| self.tiles.get(coord))
            .collect()
    }

    /// Terrain and occupancy checks for placing `kind` at `(x, y)`.
    pub fn can_build(&mut self, x: i32, y: i32, kind: StructureType) -> Result<(), BuildError> {
        let (altitude, is_forest, occupied) = {
            let tile = self.get(x, y);
            (tile.altitude, tile.is_forest, tile.is_occupied())
        };
        if altitude < 0 {
            return Err(BuildError::Underwater);
        }
        if is_forest {
            return Err(BuildError::Forested);
        }
        let max = kind.max_slope();
        for neighbor in TileCoord::new(x, y).neighbors() {
            let neighbor_altitude = self.get(neighbor.x, neighbor.y).altitude;
            if (neighbor_altitude - altitude).abs() > max {
                return Err(BuildError::TooSteep { max });
            }
        }
        if occupied {
            return Err(BuildError::Occupied);
        }
        Ok(())
    }

    /// First buildable coordinate within `radius` of `(cx, cy)`, searching
    /// outward ring by ring.
    pub fn find_site(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        kind: StructureType,
    ) -> Option<TileCoord> {
        let radius = radius as i32;
        for ring in 0..=radius {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    let site = TileCoord::new(cx, cy).offset(dx, dy);
                    if self.can_build(site.x, site.y, kind).is_ok() {
                        return Some(site);
                    }
                }
            }
        }
        None
    }

    pub fn explored_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Generated tiles sorted row-major, for stable output.
    pub fn sorted_tiles(&self) -> Vec<&Tile> {
        let mut tiles: Vec<&Tile> = self.tiles.values().collect();
        tiles.sort_by_key(|tile| (tile.y, tile.x));
        tiles
    }

    pub(crate) fn set_structure(&mut self, coord: TileCoord, kind: Option<StructureType>) {
        self.tile_mut(coord.x, coord.y).structure = kind;
    }

    /// Insert a previously generated tile verbatim. Returns false when the
    /// coordinate is already present.
    pub(crate) fn restore_tile(&mut self, tile: Tile) -> bool {
        let coord = tile.coord();
        if self.tiles.contains_key(&coord) {
            return false;
        }
        self.tiles.insert(coord, tile);
        true
    }

    pub(crate) fn clear_structures(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.structure = None;
        }
    }
}

fn region_coords(cx: i32, cy: i32, size: u32) -> Vec<TileCoord> {
    let origin = TileCoord::new(cx, cy).offset(-((size / 2) as i32), -((size / 2) as i32));
    let mut coords = Vec::with_capacity(size as usize * size as usize);
    for row in 0..size {
        for col in 0..size {
            coords.push(origin.offset(col as i32, row as i32));
        }
    }
    coords
}
