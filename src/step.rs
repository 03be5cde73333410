use growth_common::{Cell, Lattice, SimParams};
use rand::seq::SliceRandom;
use rand::Rng;

/// Applies one generation of the growth rule and returns the resulting
/// lattice.
///
/// Every occupied cell of the input snapshot is visited once in row-major
/// order:
/// 1. Nutrient: substrate above 0 is consumed by 1; a cell at 0 dies and
///    skips the remaining rules.
/// 2. Clocks: the adaptation countdown runs first; only once it is at 0 does
///    the duplication countdown decrement (floored at 0).
/// 3. Division: a duplication countdown at exactly 0 tries to place one
///    daughter in a uniformly shuffled free neighbor and then resets the
///    parent's countdown. With no free neighbor the attempt fails silently
///    and is retried on the next call.
///
/// Decisions are made against the pre-step snapshot: a cell never observes a
/// same-pass update of another cell, and a daughter is never visited within
/// the pass that created it. A neighbor only qualifies for a daughter if it
/// is free in the snapshot and still free in the result, so two parents
/// cannot stack daughters on one site.
pub fn step<R: Rng + ?Sized>(lattice: &Lattice, params: &SimParams, rng: &mut R) -> Lattice {
    let mut next = lattice.clone();
    let dim = lattice.dim();

    for i in 0..dim {
        for j in 0..dim {
            if !lattice.get(i, j).occupied {
                continue;
            }
            let mut cell = *lattice.get(i, j);

            // Substrate consumption; depletion is terminal.
            if cell.substrate > 0 {
                cell.substrate -= 1;
            } else {
                cell.occupied = false;
                next.set(i, j, cell);
                continue;
            }

            // Lag phase gates the division countdown.
            if cell.adaptation > 0 {
                cell.adaptation -= 1;
            } else if cell.duplication > 0 {
                cell.duplication -= 1;
            }

            // Division attempt; at most one daughter per parent per call.
            if cell.duplication == 0 {
                let mut neighbors = lattice.moore_neighbors(i, j);
                neighbors.shuffle(rng);
                for (ni, nj) in neighbors {
                    if !lattice.get(ni, nj).occupied && !next.get(ni, nj).occupied {
                        next.set(ni, nj, Cell::daughter(params));
                        cell.duplication = params.duplication_time;
                        break;
                    }
                }
            }

            next.set(i, j, cell);
        }
    }

    next
}
