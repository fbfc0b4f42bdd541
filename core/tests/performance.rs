use elembench_core::types::{BenchConfig, BudgetMode, Budgets, LayerSpec, node_count};
use elembench_core::{Harness, Phase};
use tempfile::TempDir;

fn config_in(temp: &TempDir) -> BenchConfig {
    BenchConfig {
        temp_root: Some(temp.path().to_path_buf()),
        ..BenchConfig::default()
    }
}

/// Reference run: 1000/2/4/1 layers (19000 nodes) against the default budgets
/// (700/200/600/1000 ms). Run with `cargo test --release -- --ignored`.
#[test]
#[ignore = "timing-sensitive, run in release mode"]
fn test_reference_scenario_meets_default_budgets() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(config_in(&temp)).unwrap();

    let report = harness.run().unwrap();

    assert_eq!(report.node_count, 19000);
    assert!(report.within_budget(), "{:?}", report.phases);
    assert!(!report.store_path.exists());
    assert!(!harness.config().test_folder().exists());
}

/// Full-size run with every default budget widened tenfold, so it holds in
/// debug builds on shared machines.
#[test]
fn test_reference_scale_within_tenfold_budgets() {
    let temp = TempDir::new().unwrap();
    let defaults = Budgets::default();
    let config = BenchConfig {
        budgets: Budgets {
            insert_ms: defaults.insert_ms * 10,
            read_ms: defaults.read_ms * 10,
            file_write_ms: defaults.file_write_ms * 10,
            file_read_ms: defaults.file_read_ms * 10,
        },
        ..config_in(&temp)
    };
    let harness = Harness::new(config).unwrap();

    let report = harness.run().unwrap();

    assert_eq!(report.node_count, 19000);
    assert!(report.within_budget(), "{:?}", report.phases);
    assert!(!harness.config().test_folder().exists());
}

/// Same data-integrity checks at a size that runs in debug builds.
#[test]
fn test_reduced_scenario_round_trips_every_node() {
    let temp = TempDir::new().unwrap();
    let layers = vec![
        LayerSpec::new("1", 20),
        LayerSpec::new("2", 2),
        LayerSpec::new("3", 4),
        LayerSpec::new("4", 1),
    ];
    let config = BenchConfig {
        layers: layers.clone(),
        budgets: Budgets::uniform(120_000),
        workers: Some(8),
        ..config_in(&temp)
    };
    let harness = Harness::new(config).unwrap();

    let report = harness.run().unwrap();

    assert_eq!(report.node_count, node_count(&layers));
    assert_eq!(report.node_count, 20 + 40 + 160 + 160);
    for phase in [Phase::Insert, Phase::Read, Phase::FileWrite, Phase::FileRead] {
        assert!(report.phase(phase).unwrap().within_budget());
    }
    assert!(!report.store_path.exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_report_mode_never_fails_on_budget() {
    let temp = TempDir::new().unwrap();
    let config = BenchConfig {
        layers: vec![LayerSpec::new("1", 10), LayerSpec::new("2", 3)],
        budgets: Budgets::uniform(0),
        budget_mode: BudgetMode::Report,
        ..config_in(&temp)
    };

    let report = Harness::new(config).unwrap().run().unwrap();

    assert_eq!(report.node_count, 40);
    assert!(!report.within_budget());
}

#[test]
fn test_config_file_drives_the_run() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bench.toml");
    let saved = BenchConfig {
        layers: vec![LayerSpec::new("root", 4), LayerSpec::new("leaf", 2)],
        budgets: Budgets::uniform(60_000),
        workers: Some(2),
        ..config_in(&temp)
    };
    saved.save(&path).unwrap();

    let loaded = BenchConfig::load(&path).unwrap();
    let report = Harness::new(loaded).unwrap().run().unwrap();

    assert_eq!(report.node_count, 12);
    assert!(path.exists());
}
