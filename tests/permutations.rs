//! Integration tests for decision-script enumeration and replay.
//!
//! - Enumeration visits every reachable script once, in counter order
//! - Scripts that outlive a run are flagged as non-determinism
//! - Replay scripts run exactly once and survive a text round trip

mod common;
use common::*;

use detlab::lab::{run_all_permutations, PermutationExplorer, Script};
use detlab::{ErrorKind, ExploreConfig};
use std::cell::Cell;

#[test]
fn either_once_runs_false_then_true() {
    init_test_logging();
    test_phase!("either_once_runs_false_then_true");

    let mut seen = Vec::new();
    let report = run_all_permutations(|d| seen.push(d.either()));

    assert_sequence(&seen, &[false, true]);
    assert_eq!(report.runs, 2);
    assert!(report.exhausted);
    test_complete!("either_once_runs_false_then_true");
}

#[test]
fn either_then_choose_five_in_counter_order() {
    init_test_logging();
    test_phase!("either_then_choose_five_in_counter_order");

    let mut seen = Vec::new();
    run_all_permutations(|d| {
        let b = d.either();
        let i = d.choose(5);
        seen.push((b, i));
    });

    let expected = [
        (false, 0),
        (false, 1),
        (false, 2),
        (false, 3),
        (false, 4),
        (true, 0),
        (true, 1),
        (true, 2),
        (true, 3),
        (true, 4),
    ];
    assert_sequence(&seen, &expected);
    test_complete!("either_then_choose_five_in_counter_order", runs = seen.len());
}

#[test]
fn choose_enumerates_every_value_once() {
    init_test_logging();
    test_phase!("choose_enumerates_every_value_once");

    for n in 1..=17 {
        let mut seen = Vec::new();
        let report = run_all_permutations(|d| seen.push(d.choose(n)));
        let expected: Vec<usize> = (0..n).collect();
        assert_eq!(seen, expected, "n = {n}");
        assert_eq!(report.runs, n as u64);
    }
    test_complete!("choose_enumerates_every_value_once");
}

#[test]
fn dependent_branches_cover_the_tree() {
    init_test_logging();
    test_phase!("dependent_branches_cover_the_tree");

    let mut paths = Vec::new();
    run_all_permutations(|d| {
        let mut path = String::new();
        if d.either() {
            path.push('R');
            if d.either() {
                path.push('R');
            } else {
                path.push('L');
            }
        } else {
            path.push('L');
        }
        paths.push(path);
    });

    assert_sequence(&paths, &["L".to_owned(), "RL".to_owned(), "RR".to_owned()]);
    test_complete!("dependent_branches_cover_the_tree");
}

#[test]
fn external_state_is_flagged_within_bounded_runs() {
    init_test_logging();
    test_phase!("external_state_is_flagged_within_bounded_runs");

    let counter = Cell::new(0u32);
    let err = PermutationExplorer::default()
        .run(|d| {
            counter.set(counter.get() + 1);
            // Decision count depends on a counter that lives outside the script.
            let wanted = if counter.get() % 3 == 0 { 1 } else { 3 };
            for _ in 0..wanted {
                d.either();
            }
        })
        .expect_err("non-determinism must be reported");

    assert_eq!(err.kind(), ErrorKind::NonDeterministic);
    assert!(counter.get() <= 3, "flagged after {} runs", counter.get());
    let msg = err.to_string();
    assert!(msg.contains("DETLAB_REPLAY="), "{msg}");
    test_complete!("external_state_is_flagged_within_bounded_runs");
}

#[test]
fn reported_script_replays_the_failing_run() {
    init_test_logging();
    test_phase!("reported_script_replays_the_failing_run");

    // Find the script that produces a specific choice.
    let target = 31_231;
    let mut found = None;
    PermutationExplorer::new(ExploreConfig::new().max_runs(40_000))
        .run(|d| {
            if d.choose(40_000) == target && found.is_none() {
                found = Some(d.script().clone());
            }
        })
        .expect("deterministic");
    let script = found.expect("target reached");

    test_section!("replay");
    let text = script.to_text();
    let config = ExploreConfig::new().replay_text(&text).expect("round trip");
    let mut picks = Vec::new();
    let report = PermutationExplorer::new(config)
        .run(|d| picks.push(d.choose(40_000)))
        .expect("deterministic");

    assert_eq!(picks, [target]);
    assert_eq!(report.runs, 1);
    assert_eq!(report.replayed.as_ref().map(Script::to_text), Some(text));
    test_complete!("reported_script_replays_the_failing_run");
}

#[test]
fn panicking_body_propagates() {
    init_test_logging();
    test_phase!("panicking_body_propagates");

    let result = std::panic::catch_unwind(|| {
        run_all_permutations(|d| {
            if d.choose(8) == 5 {
                panic!("found the bug");
            }
        })
    });
    let payload = result.expect_err("panic must reach the caller");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"found the bug"));
    test_complete!("panicking_body_propagates");
}

#[test]
fn malformed_replay_text_is_rejected_before_running() {
    init_test_logging();
    test_phase!("malformed_replay_text_is_rejected_before_running");

    let err = ExploreConfig::new().replay_text("0g").expect_err("bad hex");
    assert_eq!(err.kind(), ErrorKind::InvalidReplayScript);
    test_complete!("malformed_replay_text_is_rejected_before_running");
}
