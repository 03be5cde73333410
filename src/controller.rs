use crate::dispersal::{brownian_move, redistribute};
use crate::metrics::growth_metrics;
use crate::step::step;
use anyhow::Result;
use growth_common::{
    DispersalMode, GrowthMetrics, GrowthSample, Lattice, RunSnapshot, SessionSnapshot, SimParams,
};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One culture: a lattice, its append-only growth history, and its own RNG.
pub struct SimulationRun {
    pub mode: DispersalMode,
    pub lattice: Lattice,
    pub history: Vec<GrowthSample>,
    rng: StdRng,
}

impl SimulationRun {
    fn new(mode: DispersalMode, params: &SimParams, seed: u64) -> Self {
        Self {
            mode,
            lattice: Lattice::seeded(params),
            history: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances this culture by one generation and appends a history sample.
    fn advance(&mut self, params: &SimParams, next_step: u32) {
        self.lattice = step(&self.lattice, params, &mut self.rng);
        match self.mode {
            DispersalMode::Static => {}
            DispersalMode::Brownian => {
                self.lattice = brownian_move(&self.lattice, params, &mut self.rng);
            }
            DispersalMode::Agitation => {
                if next_step % params.agitation_interval == 0 {
                    self.lattice = redistribute(&self.lattice, params, &mut self.rng);
                }
            }
        }

        let population = self.lattice.population();
        let log_population = if population > 0 {
            (population as f64).ln()
        } else {
            0.0
        };
        self.history.push(GrowthSample {
            step: next_step,
            log_population,
        });
    }

    pub fn metrics(&self) -> GrowthMetrics {
        growth_metrics(&self.history)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            mode: self.mode,
            lattice: self.lattice.clone(),
            history: self.history.clone(),
            metrics: self.metrics(),
        }
    }
}

/// Owns the three cultures of a session and the shared step counter.
///
/// The cultures share parameters but never share lattice storage, and each
/// carries its own RNG. All three RNGs are seeded with the same value so the
/// static and agitated cultures stay bit-identical until the first
/// redistribution fires. The host drives the session by calling [`tick`]
/// from whatever scheduler it owns; each call fully advances all three
/// cultures before returning.
///
/// [`tick`]: SimulationController::tick
pub struct SimulationController {
    params: SimParams,
    seed: u64,
    step_counter: u32,
    static_run: SimulationRun,
    brownian_run: SimulationRun,
    agitation_run: SimulationRun,
}

impl SimulationController {
    /// Builds a session from validated parameters. With `seed` absent, a
    /// fresh entropy seed is drawn; pass a fixed seed for replayable runs.
    pub fn new(params: SimParams, seed: Option<u64>) -> Result<Self> {
        params.validate()?;
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        debug!("Building session with seed {}", seed);
        Ok(Self {
            static_run: SimulationRun::new(DispersalMode::Static, &params, seed),
            brownian_run: SimulationRun::new(DispersalMode::Brownian, &params, seed),
            agitation_run: SimulationRun::new(DispersalMode::Agitation, &params, seed),
            params,
            seed,
            step_counter: 0,
        })
    }

    /// Rebuilds all three cultures from `params`, clears the histories, and
    /// zeroes the step counter. The session keeps its seed, so a reset run
    /// replays identically.
    pub fn reset(&mut self, params: SimParams) -> Result<()> {
        params.validate()?;
        self.static_run = SimulationRun::new(DispersalMode::Static, &params, self.seed);
        self.brownian_run = SimulationRun::new(DispersalMode::Brownian, &params, self.seed);
        self.agitation_run = SimulationRun::new(DispersalMode::Agitation, &params, self.seed);
        self.params = params;
        self.step_counter = 0;
        Ok(())
    }

    /// Advances all three cultures by one generation.
    ///
    /// Each culture is stepped once; the Brownian culture then takes a
    /// relocation pass, and the agitated culture is fully reshuffled on every
    /// `agitation_interval`-th tick. One history sample is appended per
    /// culture before the shared counter increments, keeping the three
    /// histories index-aligned.
    pub fn tick(&mut self) {
        let params = self.params;
        let next_step = self.step_counter + 1;
        for run in [
            &mut self.static_run,
            &mut self.brownian_run,
            &mut self.agitation_run,
        ] {
            run.advance(&params, next_step);
        }
        self.step_counter = next_step;
    }

    pub fn step_counter(&self) -> u32 {
        self.step_counter
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn static_run(&self) -> &SimulationRun {
        &self.static_run
    }

    pub fn brownian_run(&self) -> &SimulationRun {
        &self.brownian_run
    }

    pub fn agitation_run(&self) -> &SimulationRun {
        &self.agitation_run
    }

    /// Read-only view of the session for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            step: self.step_counter,
            static_run: self.static_run.snapshot(),
            brownian_run: self.brownian_run.snapshot(),
            agitation_run: self.agitation_run.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimParams {
        SimParams {
            dimension: 20,
            initial_substrate: 50,
            adaptation_time: 10,
            duplication_time: 5,
            agitation_interval: 50,
        }
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let mut p = params();
        p.dimension = 1000;
        assert!(SimulationController::new(p, Some(1)).is_err());
    }

    #[test]
    fn first_tick_consumes_substrate_and_adaptation() {
        let mut controller = SimulationController::new(params(), Some(7)).unwrap();
        controller.tick();

        assert_eq!(controller.step_counter(), 1);
        let lattice = &controller.static_run().lattice;
        assert_eq!(lattice.population(), 1);
        let inoculum = lattice.get(10, 10);
        assert!(inoculum.occupied);
        assert_eq!(inoculum.substrate, 49);
        assert_eq!(inoculum.adaptation, 9);
        assert_eq!(inoculum.duplication, 5);

        let history = &controller.static_run().history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].step, 1);
        assert_eq!(history[0].log_population, 0.0); // ln(1)
    }

    #[test]
    fn histories_stay_index_aligned() {
        let mut controller = SimulationController::new(params(), Some(2)).unwrap();
        for _ in 0..30 {
            controller.tick();
        }
        for run in [
            controller.static_run(),
            controller.brownian_run(),
            controller.agitation_run(),
        ] {
            assert_eq!(run.history.len(), 30);
            for (idx, sample) in run.history.iter().enumerate() {
                assert_eq!(sample.step, idx as u32 + 1);
            }
        }
    }

    #[test]
    fn agitation_matches_static_until_the_first_redistribution() {
        let mut controller = SimulationController::new(params(), Some(5)).unwrap();
        for _ in 0..49 {
            controller.tick();
            assert_eq!(
                controller.static_run().lattice,
                controller.agitation_run().lattice,
                "diverged at step {}",
                controller.step_counter()
            );
        }

        // Tick 50 reshuffles positions but preserves the population.
        controller.tick();
        assert_eq!(
            controller.static_run().lattice.population(),
            controller.agitation_run().lattice.population()
        );
    }

    #[test]
    fn starved_static_culture_goes_extinct_and_stays_flat() {
        let mut p = params();
        p.initial_substrate = 10;
        let mut controller = SimulationController::new(p, Some(4)).unwrap();
        for _ in 0..20 {
            controller.tick();
        }

        // Substrate outlasts the lag phase by nothing: the inoculum starves
        // at step 11 and the curve is flat from there on.
        let lattice = &controller.static_run().lattice;
        assert_eq!(lattice.population(), 0);
        let history = &controller.static_run().history;
        for sample in &history[10..] {
            assert_eq!(sample.log_population, 0.0);
        }
        let metrics = controller.static_run().metrics();
        assert_eq!(metrics.max_rate, 0.0);
        assert_eq!(metrics.doubling_time, 0.0);
    }

    #[test]
    fn growing_culture_reports_positive_metrics() {
        let mut p = params();
        p.adaptation_time = 0;
        p.duplication_time = 1;
        let mut controller = SimulationController::new(p, Some(6)).unwrap();
        for _ in 0..10 {
            controller.tick();
        }
        assert!(controller.static_run().lattice.population() > 1);
        let metrics = controller.static_run().metrics();
        assert!(metrics.max_rate > 0.0);
        assert!(metrics.doubling_time > 0.0);
    }

    #[test]
    fn reset_rebuilds_the_session() {
        let mut controller = SimulationController::new(params(), Some(8)).unwrap();
        for _ in 0..15 {
            controller.tick();
        }
        controller.reset(params()).unwrap();

        assert_eq!(controller.step_counter(), 0);
        for run in [
            controller.static_run(),
            controller.brownian_run(),
            controller.agitation_run(),
        ] {
            assert!(run.history.is_empty());
            assert_eq!(run.lattice.population(), 1);
        }
    }

    #[test]
    fn snapshot_reflects_all_three_runs() {
        let mut controller = SimulationController::new(params(), Some(9)).unwrap();
        for _ in 0..5 {
            controller.tick();
        }
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.step, 5);
        assert_eq!(snapshot.static_run.mode, DispersalMode::Static);
        assert_eq!(snapshot.brownian_run.mode, DispersalMode::Brownian);
        assert_eq!(snapshot.agitation_run.mode, DispersalMode::Agitation);
        assert_eq!(snapshot.static_run.history.len(), 5);
        assert_eq!(snapshot.brownian_run.history.len(), 5);
        assert_eq!(snapshot.agitation_run.history.len(), 5);
    }
}
