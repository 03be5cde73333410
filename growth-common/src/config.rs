use crate::sim_params::SimParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the culture lattice
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LatticeConfig {
    pub dimension: u32,
}

// Biological parameters of the simulated strain
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CultureConfig {
    pub initial_substrate: u32,
    pub adaptation_time: u32,
    pub duplication_time: u32,
}

// Dispersal settings shared by the three runs
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DispersalConfig {
    #[serde(default = "default_agitation_interval")]
    pub agitation_interval_steps: u32,
    /// Seed for the per-run RNGs; omit for a fresh entropy seed each session.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_agitation_interval() -> u32 {
    50
}

impl Default for DispersalConfig {
    fn default() -> Self {
        DispersalConfig {
            agitation_interval_steps: default_agitation_interval(),
            seed: None,
        }
    }
}

// Configuration for the batch run length and recording cadence
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_steps: u32,
    #[serde(default = "default_record_interval")]
    pub record_interval_steps: u32,
}

fn default_record_interval() -> u32 {
    25
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_histories: bool,
    pub save_snapshots: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

/// Main simulation configuration structure, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub lattice: LatticeConfig,
    pub culture: CultureConfig,
    #[serde(default)]
    pub dispersal: DispersalConfig,
    pub timing: TimingConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file and rejects
    /// out-of-range parameters before any lattice is built.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
        })?;
        let config: SimulationConfig = toml::from_str(&config_str).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e)
        })?;

        config.get_sim_params().validate()?;
        if config.timing.total_steps == 0 {
            anyhow::bail!("total_steps must be greater than 0.");
        }

        Ok(config)
    }

    /// Converts the configuration into the runtime parameters shared by the
    /// three runs of a session.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            dimension: self.lattice.dimension,
            initial_substrate: self.culture.initial_substrate,
            adaptation_time: self.culture.adaptation_time,
            duplication_time: self.culture.duplication_time,
            agitation_interval: self.dispersal.agitation_interval_steps,
        }
    }
}
