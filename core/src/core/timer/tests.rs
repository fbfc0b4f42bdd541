use super::*;

#[test]
fn test_finish_records_phase_and_budget() {
    let timer = PhaseTimer::start(Phase::FileRead);
    std::thread::sleep(Duration::from_millis(5));
    let report = timer.finish(Duration::from_secs(60));

    assert_eq!(report.phase, Phase::FileRead);
    assert_eq!(report.budget, Duration::from_secs(60));
    assert!(report.elapsed >= Duration::from_millis(5));
    assert!(report.within_budget());
}

#[test]
fn test_over_budget_is_detected() {
    let report = PhaseReport {
        phase: Phase::Insert,
        elapsed: Duration::from_millis(701),
        budget: Duration::from_millis(700),
    };
    assert!(!report.within_budget());
}

#[test]
fn test_exactly_on_budget_is_within() {
    let report = PhaseReport {
        phase: Phase::Read,
        elapsed: Duration::from_millis(200),
        budget: Duration::from_millis(200),
    };
    assert!(report.within_budget());
}

#[test]
fn test_phase_display() {
    assert_eq!(Phase::Insert.to_string(), "insert");
    assert_eq!(Phase::FileWrite.to_string(), "file write");
}
