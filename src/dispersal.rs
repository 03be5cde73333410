use growth_common::{Cell, Lattice, SimParams};
use rand::seq::SliceRandom;
use rand::Rng;

/// Applies one Brownian relocation pass and returns the resulting lattice.
///
/// Cells are swept in row-major order over the lattice being built, so a
/// relocation is visible to cells visited later in the same pass (the
/// within-pass visibility here is intentional and differs from [`step`]).
/// Each occupied cell moves its full state to the first free neighbor of a
/// uniformly shuffled Moore set; the vacated site is reset to the vacant
/// default. A cell with no free neighbor stays put. Movement never changes
/// substrate or clock values.
///
/// [`step`]: crate::step::step
pub fn brownian_move<R: Rng + ?Sized>(
    lattice: &Lattice,
    params: &SimParams,
    rng: &mut R,
) -> Lattice {
    let mut next = lattice.clone();
    let dim = next.dim();

    for i in 0..dim {
        for j in 0..dim {
            if !next.get(i, j).occupied {
                continue;
            }
            let mut neighbors = next.moore_neighbors(i, j);
            neighbors.shuffle(rng);
            for (ni, nj) in neighbors {
                if !next.get(ni, nj).occupied {
                    let moving = *next.get(i, j);
                    next.set(ni, nj, moving);
                    next.set(i, j, Cell::vacant(params));
                    break;
                }
            }
        }
    }

    next
}

/// Fully reshuffles the culture: every occupied cell is reassigned a
/// uniformly random free position on a fresh lattice.
///
/// Models complete physical mixing. Positions are destroyed and the local
/// substrate is reset to the initial endowment, but the internal
/// adaptation/duplication clocks of each cell survive the move.
pub fn redistribute<R: Rng + ?Sized>(
    lattice: &Lattice,
    params: &SimParams,
    rng: &mut R,
) -> Lattice {
    let clocks: Vec<(u32, u32)> = lattice
        .iter()
        .filter(|(_, cell)| cell.occupied)
        .map(|(_, cell)| (cell.adaptation, cell.duplication))
        .collect();

    let mut next = Lattice::vacant(params);
    let dim = next.dim();
    for (adaptation, duplication) in clocks {
        // Rejection draw; the population can never exceed the site count.
        loop {
            let i = rng.random_range(0..dim);
            let j = rng.random_range(0..dim);
            if !next.get(i, j).occupied {
                let mut cell = Cell::daughter(params);
                cell.adaptation = adaptation;
                cell.duplication = duplication;
                next.set(i, j, cell);
                break;
            }
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(dimension: u32) -> SimParams {
        SimParams {
            dimension,
            initial_substrate: 50,
            adaptation_time: 10,
            duplication_time: 5,
            agitation_interval: 50,
        }
    }

    fn occupied(substrate: u32, adaptation: u32, duplication: u32) -> Cell {
        Cell {
            occupied: true,
            substrate,
            adaptation,
            duplication,
        }
    }

    #[test]
    fn lone_cell_moves_to_an_adjacent_site_intact() {
        let p = params(5);
        let mut lattice = Lattice::vacant(&p);
        lattice.set(2, 2, occupied(42, 7, 3));

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let next = brownian_move(&lattice, &p, &mut rng);
            assert_eq!(next.population(), 1);

            let (pos, cell) = next.iter().find(|(_, c)| c.occupied).unwrap();
            let chebyshev = (pos.0 as i64 - 2).abs().max((pos.1 as i64 - 2).abs());
            assert_eq!(chebyshev, 1, "seed {}", seed);
            assert_eq!(cell.substrate, 42);
            assert_eq!(cell.adaptation, 7);
            assert_eq!(cell.duplication, 3);
            assert_eq!(*next.get(2, 2), Cell::vacant(&p));
        }
    }

    #[test]
    fn movement_preserves_population() {
        let p = params(10);
        let mut lattice = Lattice::vacant(&p);
        for k in 0..30usize {
            lattice.set((k * 3) % 10, (k * 7) % 10, occupied(20 + k as u32, 0, 5));
        }
        let before = lattice.population();
        let mut rng = StdRng::seed_from_u64(11);

        let next = brownian_move(&lattice, &p, &mut rng);
        assert_eq!(next.population(), before);
    }

    #[test]
    fn full_lattice_cannot_move() {
        let p = params(5);
        let mut lattice = Lattice::vacant(&p);
        for i in 0..5 {
            for j in 0..5 {
                lattice.set(i, j, occupied(10 + (i * 5 + j) as u32, 1, 2));
            }
        }
        let mut rng = StdRng::seed_from_u64(9);

        let next = brownian_move(&lattice, &p, &mut rng);
        assert_eq!(next, lattice);
    }

    #[test]
    fn redistribution_preserves_count_and_clock_multiset() {
        let p = params(8);
        let mut lattice = Lattice::vacant(&p);
        let mut expected_clocks = Vec::new();
        for k in 0..12u32 {
            let cell = occupied(k + 1, k % 4, k % 6);
            lattice.set(k as usize / 8, k as usize % 8, cell);
            expected_clocks.push((cell.adaptation, cell.duplication));
        }
        expected_clocks.sort_unstable();
        let mut rng = StdRng::seed_from_u64(21);

        let next = redistribute(&lattice, &p, &mut rng);
        assert_eq!(next.population(), 12);

        let mut clocks: Vec<(u32, u32)> = next
            .iter()
            .filter(|(_, c)| c.occupied)
            .map(|(_, c)| (c.adaptation, c.duplication))
            .collect();
        clocks.sort_unstable();
        assert_eq!(clocks, expected_clocks);

        // Mixing refreshes the local nutrient.
        for (_, cell) in next.iter().filter(|(_, c)| c.occupied) {
            assert_eq!(cell.substrate, p.initial_substrate);
        }
    }

    #[test]
    fn redistribution_shows_no_position_stickiness() {
        let p = params(10);
        let mut lattice = Lattice::vacant(&p);
        lattice.set(5, 5, occupied(30, 2, 4));
        let mut rng = StdRng::seed_from_u64(33);

        let mut positions = std::collections::HashSet::new();
        for _ in 0..200 {
            let next = redistribute(&lattice, &p, &mut rng);
            let (pos, _) = next.iter().find(|(_, c)| c.occupied).unwrap();
            positions.insert(pos);
        }
        // 200 uniform draws over 100 sites should land on most of the board.
        assert!(positions.len() > 50, "only {} distinct sites", positions.len());
    }
}
