pub mod config;
pub mod lattice;
pub mod sim_params;
pub mod snapshot;

// Re-export key types for easier use by dependent crates
pub use config::{
    CultureConfig, DispersalConfig, LatticeConfig, OutputConfig, SimulationConfig, TimingConfig,
};
pub use lattice::{Cell, Lattice};
pub use sim_params::SimParams;
pub use snapshot::{DispersalMode, GrowthMetrics, GrowthSample, RunSnapshot, SessionSnapshot};
