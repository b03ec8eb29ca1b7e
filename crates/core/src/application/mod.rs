// Application Layer - Use Cases and Business Logic

pub mod simulator;

// Re-exports
pub use simulator::{MergePolicy, QueueSimulator, SimulatorConfig, SimulatorStats};
