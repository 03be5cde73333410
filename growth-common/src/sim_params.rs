use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted lattice side length.
pub const DIMENSION_RANGE: RangeInclusive<u32> = 5..=50;
/// Accepted per-cell nutrient endowment.
pub const SUBSTRATE_RANGE: RangeInclusive<u32> = 10..=200;
/// Accepted lag-phase duration.
pub const ADAPTATION_RANGE: RangeInclusive<u32> = 0..=50;
/// Accepted division-cycle duration.
pub const DUPLICATION_RANGE: RangeInclusive<u32> = 1..=20;

/// Runtime parameters shared by every lattice of a session, derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimParams {
    /// Lattice side length M (the lattice is M x M).
    pub dimension: u32,
    /// Nutrient units a cell holds at birth; one unit is consumed per step.
    pub initial_substrate: u32,
    /// Steps of lag phase before the division countdown starts.
    pub adaptation_time: u32,
    /// Steps between division attempts once adapted.
    pub duplication_time: u32,
    /// Steps between full redistributions of the agitated culture.
    pub agitation_interval: u32,
}

impl SimParams {
    /// Checks every parameter against its documented range.
    ///
    /// Out-of-range values would corrupt center seeding and neighbor search,
    /// so sessions must not be built from unvalidated parameters.
    pub fn validate(&self) -> Result<()> {
        if !DIMENSION_RANGE.contains(&self.dimension) {
            anyhow::bail!(
                "dimension {} outside accepted range {:?}",
                self.dimension,
                DIMENSION_RANGE
            );
        }
        if !SUBSTRATE_RANGE.contains(&self.initial_substrate) {
            anyhow::bail!(
                "initial_substrate {} outside accepted range {:?}",
                self.initial_substrate,
                SUBSTRATE_RANGE
            );
        }
        if !ADAPTATION_RANGE.contains(&self.adaptation_time) {
            anyhow::bail!(
                "adaptation_time {} outside accepted range {:?}",
                self.adaptation_time,
                ADAPTATION_RANGE
            );
        }
        if !DUPLICATION_RANGE.contains(&self.duplication_time) {
            anyhow::bail!(
                "duplication_time {} outside accepted range {:?}",
                self.duplication_time,
                DUPLICATION_RANGE
            );
        }
        if self.agitation_interval == 0 {
            anyhow::bail!("agitation_interval must be at least 1");
        }
        Ok(())
    }
}
