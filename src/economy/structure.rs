use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::TileCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    House,
    Farm,
    Mine,
    Lumber,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost {
    pub money: f64,
    pub wood: f64,
    pub food: f64,
}

impl StructureType {
    pub const ALL: [StructureType; 4] = [
        StructureType::House,
        StructureType::Farm,
        StructureType::Mine,
        StructureType::Lumber,
    ];

    pub fn cost(self) -> Cost {
        match self {
            StructureType::House => Cost {
                money: 100.0,
                wood: 50.0,
                food: 0.0,
            },
            StructureType::Farm => Cost {
                money: 80.0,
                wood: 30.0,
                food: 10.0,
            },
            StructureType::Mine => Cost {
                money: 120.0,
                wood: 60.0,
                food: 0.0,
            },
            StructureType::Lumber => Cost {
                money: 50.0,
                wood: 20.0,
                food: 0.0,
            },
        }
    }

    /// Largest altitude difference tolerated against any axis neighbour.
    pub fn max_slope(self) -> i32 {
        match self {
            StructureType::House | StructureType::Farm => 1,
            StructureType::Lumber => 2,
            StructureType::Mine => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StructureType::House => "house",
            StructureType::Farm => "farm",
            StructureType::Mine => "mine",
            StructureType::Lumber => "lumber",
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown structure type '{0}' (expected house, farm, mine or lumber)")]
pub struct ParseStructureTypeError(pub String);

impl FromStr for StructureType {
    type Err = ParseStructureTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        StructureType::ALL
            .into_iter()
            .find(|kind| kind.label() == needle)
            .ok_or_else(|| ParseStructureTypeError(s.to_string()))
    }
}

/// Extraction tier of a mine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ore {
    Stone,
    Iron,
    Uranium,
}

impl Ore {
    /// Most that a mine can pull per tick at this tier.
    pub fn extraction_rate(self) -> f64 {
        match self {
            Ore::Stone => 1.0,
            Ore::Iron => 0.5,
            Ore::Uranium => 0.2,
        }
    }

    /// Wood credited per unit mined.
    pub fn wood_value(self) -> f64 {
        match self {
            Ore::Stone => 0.5,
            Ore::Iron => 1.0,
            Ore::Uranium => 2.0,
        }
    }

    pub fn next_tier(self) -> Option<Ore> {
        match self {
            Ore::Stone => Some(Ore::Iron),
            Ore::Iron => Some(Ore::Uranium),
            Ore::Uranium => None,
        }
    }
}

impl fmt::Display for Ore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Ore::Stone => "stone",
            Ore::Iron => "iron",
            Ore::Uranium => "uranium",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StructureKind {
    House {
        residents: u32,
        capacity: u32,
    },
    Farm {
        food_per_tick: f64,
    },
    Mine {
        resource_level: Ore,
        extracted_amount: f64,
    },
    Lumber {
        wood_per_tick: f64,
    },
}

impl StructureKind {
    pub fn fresh(kind: StructureType) -> Self {
        match kind {
            StructureType::House => StructureKind::House {
                residents: 0,
                capacity: 5,
            },
            StructureType::Farm => StructureKind::Farm { food_per_tick: 0.5 },
            StructureType::Mine => StructureKind::Mine {
                resource_level: Ore::Stone,
                extracted_amount: 0.0,
            },
            StructureType::Lumber => StructureKind::Lumber { wood_per_tick: 0.5 },
        }
    }

    pub fn structure_type(&self) -> StructureType {
        match self {
            StructureKind::House { .. } => StructureType::House,
            StructureKind::Farm { .. } => StructureType::Farm,
            StructureKind::Mine { .. } => StructureType::Mine,
            StructureKind::Lumber { .. } => StructureType::Lumber,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub x: i32,
    pub y: i32,
    pub level: u32,
    #[serde(flatten)]
    pub kind: StructureKind,
}

impl Structure {
    pub fn new(coord: TileCoord, kind: StructureType) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            level: 1,
            kind: StructureKind::fresh(kind),
        }
    }

    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }

    pub fn structure_type(&self) -> StructureType {
        self.kind.structure_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure_type() {
        assert_eq!("house".parse::<StructureType>(), Ok(StructureType::House));
        assert_eq!(" Lumber ".parse::<StructureType>(), Ok(StructureType::Lumber));
        assert!("castle".parse::<StructureType>().is_err());
    }

    #[test]
    fn test_fresh_payloads() {
        let house = Structure::new(TileCoord::new(1, 2), StructureType::House);
        assert_eq!(house.level, 1);
        assert_eq!(
            house.kind,
            StructureKind::House {
                residents: 0,
                capacity: 5
            }
        );
        let mine = StructureKind::fresh(StructureType::Mine);
        assert_eq!(
            mine,
            StructureKind::Mine {
                resource_level: Ore::Stone,
                extracted_amount: 0.0
            }
        );
        for kind in StructureType::ALL {
            assert_eq!(StructureKind::fresh(kind).structure_type(), kind);
        }
    }

    #[test]
    fn test_ore_ladder() {
        assert_eq!(Ore::Stone.next_tier(), Some(Ore::Iron));
        assert_eq!(Ore::Iron.next_tier(), Some(Ore::Uranium));
        assert_eq!(Ore::Uranium.next_tier(), None);
    }

    #[test]
    fn test_structure_json_shape() {
        let farm = Structure::new(TileCoord::new(-3, 4), StructureType::Farm);
        let json = serde_json::to_value(&farm).unwrap();
        assert_eq!(json["x"], -3);
        assert_eq!(json["level"], 1);
        assert_eq!(json["type"], "farm");
        assert_eq!(json["data"]["food_per_tick"], 0.5);
        assert!(json.get("kind").is_none());

        let back: Structure = serde_json::from_value(json).unwrap();
        assert_eq!(back, farm);
    }

    #[test]
    fn test_structure_reads_flat_record() {
        let text = r#"{"type":"mine","x":7,"y":-2,"level":2,"data":{"resource_level":"iron","extracted_amount":12.5}}"#;
        let mine: Structure = serde_json::from_str(text).unwrap();
        assert_eq!(mine.coord(), TileCoord::new(7, -2));
        assert_eq!(mine.level, 2);
        assert_eq!(
            mine.kind,
            StructureKind::Mine {
                resource_level: Ore::Iron,
                extracted_amount: 12.5
            }
        );
    }
}
