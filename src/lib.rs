pub mod controller;
pub mod dispersal;
pub mod metrics;
pub mod step;

pub use controller::{SimulationController, SimulationRun};
pub use metrics::growth_metrics;
