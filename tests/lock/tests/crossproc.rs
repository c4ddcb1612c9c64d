//! Cross-process determinism: spawns the `plan_fixture` binary under
//! several environment variants and asserts all produce identical output.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("plan_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();

    let mut command = Command::new(&bin);
    command.current_dir(work_dir);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });

    assert!(
        output.status.success(),
        "plan_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    for line in [
        "world=blocksworld_swap",
        "world=grid_3x3",
        "world=gripper_2",
        "world=locked_door",
        "termination=quality_bound_reached",
        "termination=plan_limit_reached",
        "termination=unsolvable",
        "plan_count=10",
    ] {
        assert!(baseline.lines().any(|l| l == line), "baseline output missing {line}");
    }
    assert_eq!(baseline.matches("result_digest=sha256:").count(), 4);

    // Different cwd.
    let alt_cwd = std::env::temp_dir();
    let alt_cwd = alt_cwd.to_string_lossy();
    let variant_cwd = run_variant(&alt_cwd, &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes from {root} to {alt_cwd}");

    // Different locale env.
    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    // Verbose logging goes to stderr only.
    let variant_logging = run_variant(&root, &[("RUST_LOG", "debug")]);
    assert_eq!(baseline, variant_logging, "output differs with RUST_LOG=debug");

    // Spurious env vars.
    let variant_noise = run_variant(
        &root,
        &[
            ("KPLAN_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("HOME", "/nonexistent"),
        ],
    );
    assert_eq!(baseline, variant_noise, "output differs with spurious env vars");
}

#[test]
fn fixture_matches_in_process_runs() {
    use kplan_harness::runner::{run_world, HeuristicChoice};
    use kplan_harness::worlds::grid::Grid;
    use kplan_search::{EnginePolicyV1, PlanRequestV1};

    let report = run_world(
        &Grid::new(3, 3),
        HeuristicChoice::Blind,
        &PlanRequestV1::top_k(10),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    let output = run_variant(&workspace_root(), &[]);
    assert!(output.contains(&format!("result_digest={}", report.result_digest)));
    assert!(output.contains(&format!("task_digest={}", report.task_digest)));

    let mut symmetric = EnginePolicyV1::default();
    symmetric.symmetry.search_pruning = true;
    let gripper = run_world(
        &kplan_harness::worlds::gripper::Gripper::new(2),
        HeuristicChoice::Max,
        &PlanRequestV1::top_k(5),
        &symmetric,
    )
    .unwrap();
    let digest = gripper.symmetry_digest.unwrap();
    assert!(output.contains(&format!("symmetry_digest={digest}")));
}
