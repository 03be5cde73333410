use crate::sim_params::SimParams;
use serde::{Deserialize, Serialize};

/// One site of the culture lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Whether a bacterium currently lives here.
    pub occupied: bool,
    /// Remaining local nutrient; depletion to 0 kills the occupant on the
    /// next step it would consume from.
    pub substrate: u32,
    /// Lag-phase countdown; must reach 0 before the division countdown runs.
    pub adaptation: u32,
    /// Countdown to the next division attempt; 0 triggers an attempt.
    pub duplication: u32,
}

impl Cell {
    /// The state of an empty site: full nutrient, no occupant, clocks at rest.
    pub fn vacant(params: &SimParams) -> Self {
        Self {
            occupied: false,
            substrate: params.initial_substrate,
            adaptation: 0,
            duplication: params.duplication_time,
        }
    }

    /// A freshly born bacterium: full nutrient and a full lag-phase clock.
    pub fn daughter(params: &SimParams) -> Self {
        Self {
            occupied: true,
            substrate: params.initial_substrate,
            adaptation: params.adaptation_time,
            duplication: params.duplication_time,
        }
    }
}

/// An M x M grid of cells stored row-major. Edges are true boundaries; there
/// is no wraparound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    dim: usize,
    cells: Vec<Cell>,
}

impl Lattice {
    /// Builds an all-vacant lattice of side `params.dimension`.
    pub fn vacant(params: &SimParams) -> Self {
        let dim = params.dimension as usize;
        Self {
            dim,
            cells: vec![Cell::vacant(params); dim * dim],
        }
    }

    /// Builds a vacant lattice with a single inoculum at the center site
    /// `(M/2, M/2)`.
    pub fn seeded(params: &SimParams) -> Self {
        let mut lattice = Self::vacant(params);
        let center = lattice.dim / 2;
        lattice.set(center, center, Cell::daughter(params));
        lattice
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.dim && j < self.dim);
        i * self.dim + j
    }

    pub fn get(&self, i: usize, j: usize) -> &Cell {
        &self.cells[self.index(i, j)]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut Cell {
        let idx = self.index(i, j);
        &mut self.cells[idx]
    }

    pub fn set(&mut self, i: usize, j: usize, cell: Cell) {
        let idx = self.index(i, j);
        self.cells[idx] = cell;
    }

    /// Number of occupied sites.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    /// Iterates over all sites in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> {
        let dim = self.dim;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| ((idx / dim, idx % dim), cell))
    }

    /// The bounded Moore neighborhood of `(i, j)`: the 3 to 8 in-range sites
    /// at Chebyshev distance 1, never including `(i, j)` itself.
    pub fn moore_neighbors(&self, i: usize, j: usize) -> Vec<(usize, usize)> {
        let mut neighbors = Vec::with_capacity(8);
        for di in -1i64..=1 {
            for dj in -1i64..=1 {
                if di == 0 && dj == 0 {
                    continue;
                }
                let ni = i as i64 + di;
                let nj = j as i64 + dj;
                if ni >= 0 && nj >= 0 && (ni as usize) < self.dim && (nj as usize) < self.dim {
                    neighbors.push((ni as usize, nj as usize));
                }
            }
        }
        neighbors
    }
}
