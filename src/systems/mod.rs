mod census;
mod consumption;
mod farming;
mod growth;
mod lumber;
mod mining;

pub use census::CensusSystem;
pub use consumption::{ConsumptionSystem, StarvationSystem};
pub use farming::FarmIncomeSystem;
pub use growth::GrowthSystem;
pub use lumber::LumberSystem;
pub use mining::MiningSystem;
