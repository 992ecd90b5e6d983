//! End-to-end decomposition scenarios.

use std::collections::BTreeSet;

use allot::config::OverheadModel;
use allot::report::ValidationReport;
use allot::{
    build_cost_matrix, Config, Error, Facet, SpecializationMatrix, StateSnapshot, Subtask,
    SubtaskPolicy, TaskDecomposer, WorkerRole,
};
use allot::orchestration::UniformOverhead;
use tempfile::TempDir;

use crate::fixtures::{reference_tasks, BRIGHTNESS_JSON};

#[test]
fn test_brightness_from_json_snapshot() {
    let state: StateSnapshot = serde_json::from_str(BRIGHTNESS_JSON).unwrap();
    let assignments = TaskDecomposer::default()
        .decompose_task("SystemBrightnessMax", &state)
        .unwrap();

    assert_eq!(assignments.len(), 3);
    let facets: BTreeSet<_> = assignments.iter().filter_map(|a| a.subtask.facet()).collect();
    assert_eq!(facets.len(), 3);
    let roles: BTreeSet<_> = assignments.iter().map(|a| a.worker).collect();
    assert_eq!(roles.len(), 3);

    let coordination: f64 = assignments.iter().map(|a| a.coordination_cost).sum();
    assert!((coordination - 0.15).abs() < 1e-9);
}

#[test]
fn test_reference_tasks_go_to_specialists() {
    let decomposer = TaskDecomposer::default();
    for (name, state) in reference_tasks() {
        let plan = decomposer.plan(name, &state).unwrap();
        assert_eq!(plan.task, name);
        assert_eq!(plan.predicted_steps(), 3);
        for a in &plan.assignments {
            assert_eq!(a.worker, a.subtask.facet().unwrap().owner(), "task {}", name);
            assert!((0.0..=1.0).contains(&a.confidence));
        }
    }
}

#[test]
fn test_shape_mismatch_for_short_complexity() {
    let subtasks = vec![Subtask::new(Facet::Verification, "verify_state", 1)];
    let result = build_cost_matrix(
        &[1.0, 2.0],
        &subtasks,
        &SpecializationMatrix::default(),
        &UniformOverhead::default(),
    );
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_custom_specialization_table() {
    // A Verifier as good at execution as at verification breaks diagonal
    // dominance, so the table is refused up front.
    let rows = [[0.9, 0.3, 0.2], [0.2, 0.9, 0.3], [0.3, 0.9, 0.9]];
    assert!(SpecializationMatrix::new(rows).is_err());

    let rows = [[0.6, 0.5, 0.1], [0.2, 0.9, 0.3], [0.3, 0.2, 0.9]];
    let table = SpecializationMatrix::new(rows).unwrap();
    let plan = TaskDecomposer::new(table)
        .plan("ContactsAdd", &StateSnapshot::new(4, &["form", "input", "button"]))
        .unwrap();
    let planner = plan
        .assignments
        .iter()
        .find(|a| a.subtask.facet() == Some(Facet::Planning))
        .unwrap();
    assert_eq!(planner.worker, WorkerRole::Planner);
    assert!(planner.confidence < 1.0);
}

#[test]
fn test_config_driven_decomposer() {
    let text = r#"
overhead_model = "role_pair"

[subtask_policy]
kind = "adaptive"
threshold = 2.0

[assignment_policy]
kind = "bounded"
max_per_worker = 2
"#;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("allot.toml");
    std::fs::write(&path, text).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.overhead_model, OverheadModel::RolePair);
    let decomposer = config.build_decomposer().unwrap();

    // Deep, varied hierarchy: fine-grained split into four subtasks.
    let busy = StateSnapshot::new(5, &["list", "button", "dialog", "switch", "text"]);
    let plan = decomposer.plan("FilesDeleteFile", &busy).unwrap();
    assert_eq!(plan.predicted_steps(), 4);
    assert_eq!(plan.worker_distribution().get(&WorkerRole::Planner), Some(&2));

    // Shallow, sparse hierarchy: coarse execute-then-verify split.
    let sparse = StateSnapshot::new(1, &["button"]);
    let plan = decomposer.plan("SystemWifiToggle", &sparse).unwrap();
    let labels: Vec<_> = plan.assignments.iter().map(|a| a.subtask.label.as_str()).collect();
    assert_eq!(labels, vec!["direct_execution", "verify_completion"]);
    assert_eq!(plan.coordination_cost(), 0.0);
}

#[test]
fn test_skip_policy_failure_propagates() {
    let decomposer =
        TaskDecomposer::default().with_subtask_policy(SubtaskPolicy::SkipBelow { epsilon: 100.0 });
    let result = decomposer.decompose_task("SystemBrightnessMax", &StateSnapshot::new(2, &["a"]));
    assert!(matches!(result, Err(Error::EmptyInput { .. })));
}

#[test]
fn test_validation_report_for_reference_tasks() {
    let decomposer = TaskDecomposer::default();
    let mut report = ValidationReport::new();
    for (i, (name, state)) in reference_tasks().into_iter().enumerate() {
        let plan = decomposer.plan(name, &state).unwrap();
        report.record_plan(&plan, 5 + i as u32, 10.0);
    }
    assert_eq!(report.len(), 3);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empirical_results.json");
    report.save(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let brightness = &value["SystemBrightnessMax"];
    assert_eq!(brightness["predicted_steps"], 3);
    assert_eq!(brightness["actual_steps"], 5);
    assert!(report.mean_step_efficiency().unwrap() > 0.0);
}
