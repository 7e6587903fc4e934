pub mod economy;
pub mod engine;
pub mod noise;
pub mod persist;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod state;
pub mod systems;
pub mod world;

pub use economy::{BuildError, Economy, Structure, StructureKind, StructureType};
pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use session::{Session, SessionSnapshot};
pub use state::{GameState, Severity};
pub use world::{Tile, TileCoord, World};
