use std::fs;
use std::path::PathBuf;

use spatial_dilemma::{
    Field, FieldError, Schedule, Simulation, SimulationConfig, Strategy, StepStats, evolve,
    render_field, render_png, save_png,
};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("spatial-dilemma-{}-{name}", std::process::id()))
}

fn rows_of(field: &Field) -> Vec<String> {
    field
        .strategies()
        .chunks(field.cols())
        .map(|row| row.iter().map(|s| s.as_char()).collect())
        .collect()
}

#[test]
fn loads_and_evolves_field_from_disk() {
    let path = scratch_path("invasion.txt");
    fs::write(&path, "5 5\nCCCCC\nCCCCC\nCCDCC\nCCCCC\nCCCCC\n").unwrap();

    let field = Field::from_file(&path).unwrap();
    assert_eq!((field.rows(), field.cols()), (5, 5));

    let evolved = evolve(field, 1, 1.65);
    assert_eq!(
        rows_of(&evolved),
        vec!["CCCCC", "CDDDC", "CDDDC", "CDDDC", "CCCCC"]
    );
    // The eight new defectors are marked as transitions for the renderer.
    let newly_defected = evolved
        .cells()
        .iter()
        .filter(|c| c.previous_strategy == Some(Strategy::Cooperate) && c.strategy == Strategy::Defect)
        .count();
    assert_eq!(newly_defected, 8);

    fs::remove_file(&path).ok();
}

#[test]
fn missing_file_reports_path() {
    let path = scratch_path("does-not-exist.txt");
    match Field::from_file(&path) {
        Err(FieldError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn malformed_file_is_rejected_before_running() {
    let path = scratch_path("ragged.txt");
    fs::write(&path, "3 3\nCCC\nCC\nCCC\n").unwrap();
    assert!(matches!(
        Field::from_file(&path),
        Err(FieldError::RowLength { row: 1, .. })
    ));
    fs::remove_file(&path).ok();
}

#[test]
fn simulation_matches_reference_loop_on_both_schedules() {
    let start: Field = "6 8\nCCCCCCCC\nCCDCCCCC\nCCCCCCDC\nCDCCCCCC\nCCCCCDCC\nCCCCCCCC\n"
        .parse()
        .unwrap();
    let expected = evolve(start.clone(), 10, 1.75);

    for schedule in [Schedule::Sequential, Schedule::Parallel] {
        let config = SimulationConfig {
            schedule,
            ..SimulationConfig::new(1.75, 10)
        };
        let mut sim = Simulation::new(start.clone(), config).unwrap();
        sim.run();
        let (field, stats) = sim.into_parts();
        assert_eq!(field, expected);
        assert_eq!(stats.history.len(), 10);
        for step in &stats.history {
            assert_eq!(step.cooperators + step.defectors, 48);
        }
        assert_eq!(
            stats.last().copied(),
            Some(StepStats::from_field(10, &expected))
        );
    }
}

#[test]
fn final_field_renders_and_saves() {
    let field = evolve("4 6\nCCCCCC\nCCDCCC\nCCCCCC\nCCCCCC\n".parse().unwrap(), 2, 1.4);
    let bytes = render_png(&field, 5).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));

    let path = scratch_path("final.png");
    save_png(&field, 5, &path).unwrap();
    let written = image::open(&path).unwrap().to_rgb8();
    assert_eq!(written, render_field(&field, 5).unwrap());
    fs::remove_file(&path).ok();
}

#[test]
fn stats_report_serialises_config_and_history() {
    let start = Field::uniform(3, 3, Strategy::Defect).unwrap();
    let mut sim = Simulation::new(start, SimulationConfig::new(2.0, 2)).unwrap();
    sim.run();
    let json = sim.stats().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["rows"], 3);
    assert_eq!(value["config"]["temptation"], 2.0);
    assert_eq!(value["config"]["schedule"], "parallel");
    assert_eq!(value["history"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["history"][1]["defectors"], 9);
}
