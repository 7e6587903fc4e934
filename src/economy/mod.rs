//! Structure registry and the build/demolish commands.
//!
//! The economy is the only owner of structures. Tiles carry a
//! [`StructureType`] tag so renderers can query them, and every mutation here
//! keeps that tag in step with the registry.

mod structure;

use thiserror::Error;

pub use structure::{
    Cost, Ore, ParseStructureTypeError, Structure, StructureKind, StructureType,
};

use crate::state::GameState;
use crate::world::{TileCoord, World};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("not enough money: need ${needed:.0}, have ${available:.0}")]
    InsufficientMoney { needed: f64, available: f64 },
    #[error("not enough wood: need {needed:.0}, have {available:.0}")]
    InsufficientWood { needed: f64, available: f64 },
    #[error("not enough food: need {needed:.0}, have {available:.0}")]
    InsufficientFood { needed: f64, available: f64 },
    #[error("cannot build underwater")]
    Underwater,
    #[error("cannot build on a forest")]
    Forested,
    #[error("terrain too steep (max altitude difference {max})")]
    TooSteep { max: i32 },
    #[error("tile is already occupied")]
    Occupied,
}

#[derive(Debug, Default, Clone)]
pub struct Economy {
    structures: Vec<Structure>,
}

impl Economy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and place a new structure, charging its cost.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// money, wood, food, terrain, occupancy.
    pub fn build(
        &mut self,
        world: &mut World,
        state: &mut GameState,
        x: i32,
        y: i32,
        kind: StructureType,
    ) -> Result<&Structure, BuildError> {
        let cost = kind.cost();
        if state.money < cost.money {
            return Err(BuildError::InsufficientMoney {
                needed: cost.money,
                available: state.money,
            });
        }
        if state.wood < cost.wood {
            return Err(BuildError::InsufficientWood {
                needed: cost.wood,
                available: state.wood,
            });
        }
        if state.food < cost.food {
            return Err(BuildError::InsufficientFood {
                needed: cost.food,
                available: state.food,
            });
        }
        world.can_build(x, y, kind)?;

        state.money -= cost.money;
        state.wood -= cost.wood;
        state.food -= cost.food;

        let coord = TileCoord::new(x, y);
        world.set_structure(coord, Some(kind));
        let index = self.structures.len();
        self.structures.push(Structure::new(coord, kind));
        Ok(&self.structures[index])
    }

    /// Remove the structure at `(x, y)` and clear the tile's tag. No refund.
    pub fn destroy(&mut self, world: &mut World, x: i32, y: i32) -> Option<Structure> {
        let coord = TileCoord::new(x, y);
        let index = self.structures.iter().position(|s| s.coord() == coord)?;
        let removed = self.structures.remove(index);
        world.set_structure(coord, None);
        Some(removed)
    }

    /// Structures in build order.
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn list_structures(&self) -> Vec<Structure> {
        self.structures.clone()
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Structure> {
        self.structures.iter().find(|s| s.coord() == coord)
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Structure> {
        self.structures.iter_mut().find(|s| s.coord() == coord)
    }

    /// Coordinates of every structure of `kind`, in build order.
    pub fn coords_of(&self, kind: StructureType) -> Vec<TileCoord> {
        self.structures
            .iter()
            .filter(|s| s.structure_type() == kind)
            .map(Structure::coord)
            .collect()
    }

    pub fn count(&self, kind: StructureType) -> usize {
        self.structures
            .iter()
            .filter(|s| s.structure_type() == kind)
            .count()
    }

    pub fn total_housing(&self) -> u64 {
        self.structures
            .iter()
            .map(|s| match s.kind {
                StructureKind::House { capacity, .. } => capacity as u64,
                _ => 0,
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub(crate) fn from_structures(structures: Vec<Structure>) -> Self {
        Self { structures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_world() -> World {
        let mut world = World::new(21);
        for dy in -3..=3 {
            for dx in -3..=3 {
                let tile = world.tile_mut(dx, dy);
                tile.altitude = 2;
                tile.is_forest = false;
                tile.forest_health = 0.0;
            }
        }
        world
    }

    #[test]
    fn test_build_house_charges_cost() {
        let mut world = flat_world();
        let mut state = GameState::default();
        let mut economy = Economy::new();

        let house = economy
            .build(&mut world, &mut state, 0, 0, StructureType::House)
            .expect("flat dry land accepts a house")
            .clone();
        assert_eq!(house.level, 1);
        assert_eq!(
            house.kind,
            StructureKind::House {
                residents: 0,
                capacity: 5
            }
        );
        assert_eq!(state.money, 400.0);
        assert_eq!(state.wood, 50.0);
        assert_eq!(state.food, 50.0);
        assert_eq!(world.get(0, 0).structure, Some(StructureType::House));
        assert_eq!(economy.total_housing(), 5);
    }

    #[test]
    fn test_money_is_checked_before_terrain() {
        let mut world = flat_world();
        world.tile_mut(0, 0).altitude = -4;
        let mut state = GameState {
            money: 10.0,
            ..GameState::default()
        };
        let mut economy = Economy::new();
        let err = economy
            .build(&mut world, &mut state, 0, 0, StructureType::Mine)
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InsufficientMoney {
                needed: 120.0,
                available: 10.0
            }
        );
        assert_eq!(state.money, 10.0);
    }

    #[test]
    fn test_wood_then_food_checks() {
        let mut world = flat_world();
        let mut economy = Economy::new();

        let mut state = GameState {
            wood: 5.0,
            food: 0.0,
            ..GameState::default()
        };
        let err = economy
            .build(&mut world, &mut state, 0, 0, StructureType::Farm)
            .unwrap_err();
        assert!(matches!(err, BuildError::InsufficientWood { .. }));

        state.wood = 100.0;
        let err = economy
            .build(&mut world, &mut state, 0, 0, StructureType::Farm)
            .unwrap_err();
        assert!(matches!(err, BuildError::InsufficientFood { .. }));
        assert!(economy.is_empty());
    }

    #[test]
    fn test_failed_build_changes_nothing() {
        let mut world = flat_world();
        world.tile_mut(1, 1).is_forest = true;
        let mut state = GameState::default();
        let before = state.clone();
        let mut economy = Economy::new();
        assert_eq!(
            economy
                .build(&mut world, &mut state, 1, 1, StructureType::Lumber)
                .unwrap_err(),
            BuildError::Forested
        );
        assert_eq!(state, before);
        assert!(world.get(1, 1).structure.is_none());
    }

    #[test]
    fn test_one_structure_per_tile() {
        let mut world = flat_world();
        let mut state = GameState::default();
        let mut economy = Economy::new();
        economy
            .build(&mut world, &mut state, 0, 0, StructureType::Lumber)
            .unwrap();
        let err = economy
            .build(&mut world, &mut state, 0, 0, StructureType::House)
            .unwrap_err();
        assert_eq!(err, BuildError::Occupied);
        assert_eq!(economy.len(), 1);
    }

    #[test]
    fn test_destroy_clears_tile_without_refund() {
        let mut world = flat_world();
        let mut state = GameState::default();
        let mut economy = Economy::new();
        economy
            .build(&mut world, &mut state, 2, -1, StructureType::Farm)
            .unwrap();
        let money_after_build = state.money;

        let removed = economy.destroy(&mut world, 2, -1).expect("farm exists");
        assert_eq!(removed.structure_type(), StructureType::Farm);
        assert!(world.get(2, -1).structure.is_none());
        assert!(economy.is_empty());
        assert_eq!(state.money, money_after_build);

        assert!(economy.destroy(&mut world, 2, -1).is_none());
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = BuildError::InsufficientMoney {
            needed: 100.0,
            available: 42.0,
        };
        assert_eq!(err.to_string(), "not enough money: need $100, have $42");
        assert_eq!(
            BuildError::TooSteep { max: 2 }.to_string(),
            "terrain too steep (max altitude difference 2)"
        );
    }
}
