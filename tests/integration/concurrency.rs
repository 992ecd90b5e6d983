//! Concurrent use of a shared decomposer.

use std::sync::Arc;

use allot::{StateSnapshot, TaskDecomposer};

use crate::fixtures::reference_tasks;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_decomposer_across_tasks() {
    let decomposer = Arc::new(TaskDecomposer::default());
    let expected: Vec<_> = reference_tasks()
        .into_iter()
        .map(|(name, state)| decomposer.decompose_task(name, &state).unwrap())
        .collect();

    let mut handles = Vec::new();
    for round in 0..16 {
        let decomposer = Arc::clone(&decomposer);
        handles.push(tokio::spawn(async move {
            let (name, state) = reference_tasks().swap_remove(round % 3);
            (round % 3, decomposer.decompose_task(name, &state).unwrap())
        }));
    }

    for handle in handles {
        let (index, assignments) = handle.await.unwrap();
        assert_eq!(assignments, expected[index]);
    }
}

#[test]
fn test_threads_see_independent_results() {
    let decomposer = Arc::new(TaskDecomposer::default());
    std::thread::scope(|scope| {
        for depth in 1..=4u32 {
            let decomposer = Arc::clone(&decomposer);
            scope.spawn(move || {
                let state = StateSnapshot::new(depth, &["button", "text"]);
                let plan = decomposer.plan("SystemBrightnessMin", &state).unwrap();
                assert_eq!(plan.predicted_steps(), 3);
                assert!((plan.coordination_cost() - 0.15).abs() < 1e-9);
            });
        }
    });
}
