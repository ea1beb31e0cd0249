//! Determinism guarantees: a seed plus a timed input script fixes the night.

use nightshift_core::{
    DoorSide, InputEvent, InputJournal, Session, SessionConfig, replay_night,
};

fn scripted_journal(seed: u64, config: &SessionConfig) -> InputJournal {
    let mut journal = InputJournal::new(seed, config.content_hash());
    journal.record(0, InputEvent::StartSession);
    journal.record(100, InputEvent::SkipIntro);
    // Both doors shut before any agent can possibly reach one, so the
    // script is accepted in full for every seed.
    journal.record(2_000, InputEvent::OpenMonitor);
    journal.record(8_000, InputEvent::ToggleDoor(DoorSide::Left));
    journal.record(9_000, InputEvent::ToggleDoor(DoorSide::Right));
    journal
}

#[test]
fn identical_seeds_and_scripts_produce_identical_outcomes() {
    let config = SessionConfig::default();
    let first = replay_night(&config, &scripted_journal(12_345, &config))
        .expect("first replay should conclude");
    let second = replay_night(&config, &scripted_journal(12_345, &config))
        .expect("second replay should conclude");

    assert_eq!(first.final_snapshot_hash, second.final_snapshot_hash);
    assert_eq!(first.final_phase, second.final_phase);
    assert_eq!(first.attacker, second.attacker);
    assert_eq!(first.final_ms, second.final_ms);
}

#[test]
fn different_seeds_produce_different_hashes() {
    let config = SessionConfig::default();
    let first = replay_night(&config, &scripted_journal(123, &config))
        .expect("replay for seed 123 should conclude");
    let second = replay_night(&config, &scripted_journal(456, &config))
        .expect("replay for seed 456 should conclude");

    assert_ne!(first.final_snapshot_hash, second.final_snapshot_hash);
}

#[test]
fn event_log_trace_is_reproducible_for_a_seed() {
    fn run_trace(seed: u64) -> Vec<String> {
        let mut session = Session::new(seed, SessionConfig::default());
        session.apply(InputEvent::StartSession).expect("start");
        session.apply(InputEvent::SkipIntro).expect("skip");

        let mut trace = Vec::new();
        let mut seen = 0usize;
        for step in 1..=120 {
            session.advance_to(step * 500);
            let log = session.log();
            for event in &log[seen..] {
                trace.push(format!("{event:?}"));
            }
            seen = log.len();
            if session.phase().is_terminal() {
                break;
            }
        }
        trace
    }

    let left = run_trace(777);
    let right = run_trace(777);
    assert!(!left.is_empty(), "a night should log something");
    assert_eq!(left, right, "same seed should produce the same event trace");
}
