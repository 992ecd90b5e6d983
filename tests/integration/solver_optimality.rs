//! Solver optimality and determinism on small matrices.
//!
//! Every case is checked against exhaustive enumeration, which is cheap
//! for up to four workers and four subtasks.

use allot::orchestration::{total_cost, Solver};
use allot::{solve, AssignmentPolicy, CostMatrix, Error};

use crate::fixtures::{enumerate_mappings, lcg_matrix, tied_matrix};

const EPS: f64 = 1e-9;

fn brute_force_min(matrix: &CostMatrix, capacity: usize) -> f64 {
    enumerate_mappings(matrix, capacity)
        .into_iter()
        .map(|(_, cost)| cost)
        .fold(f64::INFINITY, f64::min)
}

/// Lexicographically smallest worker sequence among the optimal mappings.
/// Costs must be small integers so totals compare exactly.
fn first_optimal_mapping(matrix: &CostMatrix, capacity: usize) -> Vec<usize> {
    let mappings = enumerate_mappings(matrix, capacity);
    let best = brute_force_min(matrix, capacity);
    mappings
        .into_iter()
        .find(|(_, cost)| *cost == best)
        .map(|(mapping, _)| mapping)
        .unwrap()
}

fn workers_of(solver: &Solver, matrix: &CostMatrix) -> Vec<usize> {
    solver.solve(matrix).unwrap().iter().map(|a| a.worker).collect()
}

#[test]
fn test_square_matrices_match_brute_force() {
    for k in 1..=4 {
        for seed in 0..40 {
            let m = lcg_matrix(seed * 31 + k as u64, k, k);
            let result = solve(&m).unwrap();
            let best = brute_force_min(&m, 1);
            assert!(
                (total_cost(&result) - best).abs() < EPS,
                "k={} seed={}: solver {} vs brute force {}",
                k,
                seed,
                total_cost(&result),
                best
            );
        }
    }
}

#[test]
fn test_no_mapping_beats_the_solver() {
    let m = lcg_matrix(7, 4, 4);
    let solved = total_cost(&solve(&m).unwrap());
    for (mapping, cost) in enumerate_mappings(&m, 1) {
        assert!(solved <= cost + EPS, "mapping {:?} costs {}", mapping, cost);
    }
}

#[test]
fn test_rectangular_matrices_match_brute_force() {
    for (workers, subtasks) in [(3, 1), (3, 2), (4, 3), (4, 1)] {
        for seed in 0..20 {
            let m = lcg_matrix(seed + 1000, workers, subtasks);
            let result = solve(&m).unwrap();
            assert_eq!(result.len(), subtasks);
            let mut seen: Vec<_> = result.iter().map(|a| a.worker).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), subtasks, "a worker received two subtasks");
            assert!((total_cost(&result) - brute_force_min(&m, 1)).abs() < EPS);
        }
    }
}

#[test]
fn test_bounded_policy_matches_brute_force() {
    let solver = Solver::new(AssignmentPolicy::Bounded { max_per_worker: 2 });
    for (workers, subtasks) in [(2, 3), (2, 4), (3, 4)] {
        for seed in 0..20 {
            let m = lcg_matrix(seed + 2000, workers, subtasks);
            let result = solver.solve(&m).unwrap();
            for w in 0..workers {
                assert!(result.iter().filter(|a| a.worker == w).count() <= 2);
            }
            assert!((total_cost(&result) - brute_force_min(&m, 2)).abs() < EPS);
        }
    }
}

#[test]
fn test_one_to_one_rejects_excess_subtasks() {
    let m = lcg_matrix(3, 3, 4);
    assert!(matches!(
        solve(&m),
        Err(Error::UnsupportedAssignmentPolicy {
            workers: 3,
            subtasks: 4,
            max_per_worker: 1,
        })
    ));
}

#[test]
fn test_repeated_solves_are_identical() {
    for seed in 0..20 {
        let m = lcg_matrix(seed, 4, 4);
        let first = solve(&m).unwrap();
        for _ in 0..5 {
            assert_eq!(solve(&m).unwrap(), first);
        }
    }
}

#[test]
fn test_confidence_and_cost_ranges() {
    for seed in 0..40 {
        let m = lcg_matrix(seed + 77, 3, 3);
        for a in solve(&m).unwrap() {
            assert!((0.0..=1.0).contains(&a.confidence), "confidence {}", a.confidence);
            assert!(a.cost >= 0.0);
            assert!(a.coordination_cost >= 0.0);
        }
    }
}

#[test]
fn test_equal_costs_prefer_lower_workers() {
    let m = CostMatrix::from_rows(vec![vec![2.0, 2.0]; 4]).unwrap();
    let workers: Vec<_> = solve(&m).unwrap().iter().map(|a| a.worker).collect();
    assert_eq!(workers, vec![0, 1]);
}

#[test]
fn test_tie_displaced_by_later_subtask() {
    // Both [0, 1, 2] and [2, 0, 1] cost 2.
    let m = CostMatrix::from_rows(vec![
        vec![0.0, 0.0, 1.0],
        vec![2.0, 2.0, 2.0],
        vec![0.0, 2.0, 0.0],
    ])
    .unwrap();
    assert_eq!(workers_of(&Solver::default(), &m), vec![0, 1, 2]);
}

#[test]
fn test_ties_resolve_to_first_optimal_mapping() {
    let shapes = [(3, 3), (4, 3), (3, 2), (4, 4), (2, 1)];
    for (workers, subtasks) in shapes {
        for seed in 0..200 {
            let m = tied_matrix(seed, workers, subtasks);
            assert_eq!(
                workers_of(&Solver::default(), &m),
                first_optimal_mapping(&m, 1),
                "{}x{} seed={}",
                workers,
                subtasks,
                seed
            );
        }
    }
}

#[test]
fn test_bounded_ties_resolve_to_first_optimal_mapping() {
    let solver = Solver::new(AssignmentPolicy::Bounded { max_per_worker: 2 });
    let shapes = [(2, 4), (3, 4), (2, 3), (3, 3)];
    for (workers, subtasks) in shapes {
        for seed in 0..200 {
            let m = tied_matrix(seed + 1000, workers, subtasks);
            assert_eq!(
                workers_of(&solver, &m),
                first_optimal_mapping(&m, 2),
                "{}x{} seed={}",
                workers,
                subtasks,
                seed
            );
        }
    }
}
