//! Save files and periodic autosaves.
//!
//! A save carries every generated tile verbatim. Restoring never regenerates
//! terrain, so worn forests and structure placement survive the round trip.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economy::{Economy, Structure, StructureKind};
use crate::session::Session;
use crate::state::{GameState, MessageLog};
use crate::world::{Tile, World};

pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSave {
    pub seed: i32,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySave {
    pub structures: Vec<Structure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub scenario: String,
    pub world: WorldSave,
    pub state: GameState,
    pub economy: EconomySave,
}

#[derive(Debug, Error, PartialEq)]
pub enum RestoreError {
    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("{field} is not a finite number")]
    NonFinite { field: String },
    #[error("income tax rate {0} is outside [0, 1]")]
    TaxRateOutOfRange(f64),
    #[error("{field} stock is negative ({value})")]
    NegativeStock { field: &'static str, value: f64 },
    #[error("tile ({x}, {y}) appears more than once")]
    DuplicateTile { x: i32, y: i32 },
    #[error("tile ({x}, {y}) has forest health {value} outside [0, 100]")]
    ForestHealthOutOfRange { x: i32, y: i32, value: f64 },
    #[error("tile ({x}, {y}) has a negative deposit")]
    NegativeDeposit { x: i32, y: i32 },
    #[error("more than one structure stands on ({x}, {y})")]
    DuplicateStructure { x: i32, y: i32 },
    #[error("structure at ({x}, {y}) has level 0")]
    InvalidLevel { x: i32, y: i32 },
    #[error("structure at ({x}, {y}) has an invalid payload: {reason}")]
    InvalidPayload { x: i32, y: i32, reason: &'static str },
}

impl Session {
    pub fn to_save(&self, scenario: &str) -> SaveGame {
        SaveGame {
            format_version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now(),
            scenario: scenario.to_string(),
            world: WorldSave {
                seed: self.world.seed(),
                tiles: self.world.sorted_tiles().into_iter().cloned().collect(),
            },
            state: self.state.clone(),
            economy: EconomySave {
                structures: self.economy.list_structures(),
            },
        }
    }

    /// Rebuild a session from a save. The structure list is authoritative:
    /// tile tags are recomputed from it.
    pub fn from_save(save: SaveGame) -> Result<Session, RestoreError> {
        if save.format_version != SAVE_FORMAT_VERSION {
            return Err(RestoreError::UnsupportedVersion {
                found: save.format_version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        validate_state(&save.state)?;

        let mut world = World::new(save.world.seed);
        for tile in save.world.tiles {
            validate_tile(&tile)?;
            let (x, y) = (tile.x, tile.y);
            if !world.restore_tile(tile) {
                return Err(RestoreError::DuplicateTile { x, y });
            }
        }
        world.clear_structures();

        for structure in &save.economy.structures {
            validate_structure(structure)?;
            let coord = structure.coord();
            if world.peek(coord.x, coord.y).and_then(|t| t.structure).is_some() {
                return Err(RestoreError::DuplicateStructure {
                    x: coord.x,
                    y: coord.y,
                });
            }
            world.set_structure(coord, Some(structure.structure_type()));
        }

        Ok(Session {
            world,
            economy: Economy::from_structures(save.economy.structures),
            state: save.state,
            log: MessageLog::new(),
        })
    }
}

fn finite(field: &str, value: f64) -> Result<(), RestoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RestoreError::NonFinite {
            field: field.to_string(),
        })
    }
}

fn validate_state(state: &GameState) -> Result<(), RestoreError> {
    finite("money", state.money)?;
    finite("food", state.food)?;
    finite("wood", state.wood)?;
    finite("income_tax_rate", state.income_tax_rate)?;
    if !(0.0..=1.0).contains(&state.income_tax_rate) {
        return Err(RestoreError::TaxRateOutOfRange(state.income_tax_rate));
    }
    if state.food < 0.0 {
        return Err(RestoreError::NegativeStock {
            field: "food",
            value: state.food,
        });
    }
    if state.wood < 0.0 {
        return Err(RestoreError::NegativeStock {
            field: "wood",
            value: state.wood,
        });
    }
    Ok(())
}

fn validate_tile(tile: &Tile) -> Result<(), RestoreError> {
    let (x, y) = (tile.x, tile.y);
    let deposits = [
        tile.resources.stone,
        tile.resources.iron,
        tile.resources.uranium,
    ];
    for value in deposits.into_iter().chain([tile.forest_health]) {
        finite(&format!("tile ({x}, {y})"), value)?;
    }
    if deposits.iter().any(|value| *value < 0.0) {
        return Err(RestoreError::NegativeDeposit { x, y });
    }
    if !(0.0..=100.0).contains(&tile.forest_health) && tile.is_forest {
        return Err(RestoreError::ForestHealthOutOfRange {
            x,
            y,
            value: tile.forest_health,
        });
    }
    Ok(())
}

fn validate_structure(structure: &Structure) -> Result<(), RestoreError> {
    let (x, y) = (structure.x, structure.y);
    if structure.level == 0 {
        return Err(RestoreError::InvalidLevel { x, y });
    }
    let invalid = |reason: &'static str| RestoreError::InvalidPayload { x, y, reason };
    match structure.kind {
        StructureKind::House {
            residents,
            capacity,
        } => {
            if residents > capacity {
                return Err(invalid("more residents than capacity"));
            }
        }
        StructureKind::Farm { food_per_tick } => {
            if !food_per_tick.is_finite() || food_per_tick < 0.0 {
                return Err(invalid("food per tick must be a non-negative number"));
            }
        }
        StructureKind::Mine {
            extracted_amount, ..
        } => {
            if !extracted_amount.is_finite() || extracted_amount < 0.0 {
                return Err(invalid("extracted amount must be a non-negative number"));
            }
        }
        StructureKind::Lumber { wood_per_tick } => {
            if !wood_per_tick.is_finite() || wood_per_tick < 0.0 {
                return Err(invalid("wood per tick must be a non-negative number"));
            }
        }
    }
    Ok(())
}

pub fn save_to_path(save: &SaveGame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(save)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<SaveGame> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read save file {}", path.display()))?;
    let save: SaveGame = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(save)
}

/// Load and validate a save in one step.
pub fn load_session(path: impl AsRef<Path>) -> Result<(Session, String)> {
    let path = path.as_ref();
    let save = load_from_path(path)?;
    let scenario = save.scenario.clone();
    let session = Session::from_save(save)
        .with_context(|| format!("Save file {} failed validation", path.display()))?;
    Ok((session, scenario))
}

pub struct SnapshotWriter {
    dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(dir: &Path, interval: u64) -> Self {
        Self {
            dir: dir.to_path_buf(),
            interval,
        }
    }

    pub fn maybe_write(&self, session: &Session, scenario: &str) -> Result<Option<PathBuf>> {
        let tick = session.state.time;
        if self.interval == 0 || tick % self.interval != 0 {
            return Ok(None);
        }
        let path = self
            .dir
            .join(scenario)
            .join(format!("tick_{tick:06}.json"));
        save_to_path(&session.to_save(scenario), &path)?;
        tracing::info!(tick, path = %path.display(), "autosave written");
        Ok(Some(path))
    }
}
