pub mod amount;
pub mod bank;
pub mod csv;
pub mod generator;
pub mod model;
pub mod pacing;
pub mod processor;
pub mod queue;
pub mod simulation;

pub use amount::Amount;
pub use bank::{Account, Bank};
pub use model::{AccountId, TransactionRequest};
pub use queue::WorkQueue;
pub use simulation::{Simulation, SimulationConfig, SimulationReport};
