use serde::{Deserialize, Serialize};

use crate::economy::StructureType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate arithmetic wraps at the ends of the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Axis-adjacent neighbours in N, S, W, E order.
    pub fn neighbors(self) -> [TileCoord; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub stone: f64,
    pub iron: f64,
    pub uranium: f64,
}

impl Resources {
    pub fn accumulate(&mut self, other: &Resources) {
        self.stone += other.stone;
        self.iron += other.iron;
        self.uranium += other.uranium;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub altitude: i32,
    pub resources: Resources,
    pub is_forest: bool,
    pub forest_health: f64,
    /// Tag of the structure standing here. The economy owns the structure itself.
    #[serde(default)]
    pub structure: Option<StructureType>,
}

impl Tile {
    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }

    pub fn is_underwater(&self) -> bool {
        self.altitude < 0
    }

    pub fn is_occupied(&self) -> bool {
        self.structure.is_some()
    }

    /// Forest that can still feed a lumber yard.
    pub fn has_living_forest(&self) -> bool {
        self.is_forest && self.forest_health > 0.0
    }
}
