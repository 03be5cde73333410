use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};

/// How a culture disperses between growth steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispersalMode {
    /// Cells never move.
    Static,
    /// Every cell random-walks to a free neighbor each step.
    Brownian,
    /// All cells are reshuffled to random positions at a fixed interval.
    Agitation,
}

/// One point of a growth curve: the natural log of the population after a
/// given step. A population of 0 is recorded as 0.0 by convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthSample {
    pub step: u32,
    pub log_population: f64,
}

/// Growth-curve metrics derived from a population history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    /// Largest positive single-step increase of the log population.
    pub max_rate: f64,
    /// `ln(2) / max_rate` when growth was observed, otherwise 0.
    pub doubling_time: f64,
}

/// Read-only view of one culture for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub mode: DispersalMode,
    pub lattice: Lattice,
    pub history: Vec<GrowthSample>,
    pub metrics: GrowthMetrics,
}

/// Read-only view of the whole session: the three cultures plus the shared
/// step counter. Serializable for on-disk recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub step: u32,
    pub static_run: RunSnapshot,
    pub brownian_run: RunSnapshot,
    pub agitation_run: RunSnapshot,
}
