use serde::{Deserialize, Serialize};

use crate::economy::{BuildError, Economy, Structure, StructureType};
use crate::state::{GameState, MessageLog, Severity};
use crate::world::World;

/// One running settlement: terrain, structures, aggregate economy and the
/// event log. Passed explicitly to every operation.
#[derive(Debug)]
pub struct Session {
    pub world: World,
    pub economy: Economy,
    pub state: GameState,
    pub log: MessageLog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureCounts {
    pub houses: usize,
    pub farms: usize,
    pub mines: usize,
    pub lumber_yards: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub money: f64,
    pub food: f64,
    pub wood: f64,
    pub population: u64,
    pub employed: u64,
    pub unemployment_rate: f64,
    pub housing_capacity: u64,
    pub structures: StructureCounts,
    pub explored_tiles: usize,
}

impl Session {
    pub fn new(seed: i32, state: GameState) -> Self {
        Self {
            world: World::new(seed),
            economy: Economy::new(),
            state,
            log: MessageLog::new(),
        }
    }

    pub fn add_message(&mut self, severity: Severity, text: impl Into<String>) {
        self.log.push(self.state.time, severity, text);
    }

    pub fn can_build(&mut self, x: i32, y: i32, kind: StructureType) -> Result<(), BuildError> {
        self.world.can_build(x, y, kind)
    }

    pub fn build(
        &mut self,
        x: i32,
        y: i32,
        kind: StructureType,
    ) -> Result<Structure, BuildError> {
        let outcome = self
            .economy
            .build(&mut self.world, &mut self.state, x, y, kind)
            .cloned();
        match &outcome {
            Ok(_) => self.add_message(Severity::Info, format!("Built a {kind} at ({x}, {y})")),
            Err(err) => self.add_message(
                Severity::Warning,
                format!("Cannot build {kind} at ({x}, {y}): {err}"),
            ),
        }
        outcome
    }

    pub fn destroy(&mut self, x: i32, y: i32) -> Option<Structure> {
        let removed = self.economy.destroy(&mut self.world, x, y);
        if let Some(structure) = &removed {
            self.add_message(
                Severity::Info,
                format!("Demolished the {} at ({x}, {y})", structure.structure_type()),
            );
        }
        removed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let economy = &self.economy;
        SessionSnapshot {
            tick: self.state.time,
            money: self.state.money,
            food: self.state.food,
            wood: self.state.wood,
            population: self.state.population,
            employed: self.state.employed,
            unemployment_rate: self.state.unemployment_rate(),
            housing_capacity: economy.total_housing(),
            structures: StructureCounts {
                houses: economy.count(StructureType::House),
                farms: economy.count(StructureType::Farm),
                mines: economy.count(StructureType::Mine),
                lumber_yards: economy.count(StructureType::Lumber),
            },
            explored_tiles: self.world.explored_tiles(),
        }
    }
}
