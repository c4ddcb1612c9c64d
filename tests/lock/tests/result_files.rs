//! Tasks loaded from JSON files and results written to disk reproduce the
//! in-memory run exactly.

use kplan_harness::contract::PlanningWorld;
use kplan_harness::result_dir::{
    read_result_dir, read_task_file, write_result_dir, ResultDirReadError,
};
use kplan_harness::runner::{run_task, run_world, task_digest, HeuristicChoice};
use kplan_harness::worlds::blocksworld::Blocksworld;
use kplan_harness::worlds::gripper::Gripper;
use kplan_search::{EnginePolicyV1, PlanRequestV1};

#[test]
fn task_file_round_trip_preserves_the_run() {
    let world = Blocksworld::reverse_tower(3);
    let request = PlanRequestV1::top_k(6);
    let policy = EnginePolicyV1::default();
    let direct = run_world(&world, HeuristicChoice::Max, &request, &policy).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reverse_3.json");
    let bytes = serde_json::to_vec_pretty(&world.build_task().unwrap()).unwrap();
    std::fs::write(&path, bytes).unwrap();

    let loaded = read_task_file(&path).unwrap();
    assert_eq!(task_digest(&loaded).unwrap(), direct.task_digest);
    let from_file =
        run_task(world.world_id(), loaded, HeuristicChoice::Max, &request, &policy).unwrap();
    assert_eq!(from_file.result_digest, direct.result_digest);
}

#[test]
fn result_dir_survives_a_reload() {
    let report = run_world(
        &Gripper::new(2),
        HeuristicChoice::Max,
        &PlanRequestV1::top_k(4),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gripper_2");
    write_result_dir(&report, &out).unwrap();

    let stored = read_result_dir(&out).unwrap();
    assert_eq!(stored.result, report.result);
    assert_eq!(stored.result_digest, report.result_digest);
    assert_eq!(task_digest(&stored.task).unwrap(), report.task_digest);
}

#[test]
fn invalid_task_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    // The goal names a value outside the variable's domain.
    std::fs::write(
        &path,
        br#"{
            "variables": [{"name": "x", "values": ["no", "yes"]}],
            "operators": [],
            "initial": [0],
            "goal": [{"var": 0, "value": 5}]
        }"#,
    )
    .unwrap();
    let err = read_task_file(&path).unwrap_err();
    assert!(matches!(err, ResultDirReadError::Parse { .. }));
    assert!(err.to_string().contains("out of range"));

    let missing = read_task_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ResultDirReadError::MissingFile { .. }));
}
