//! End-to-end tests of the sampling and classification pipeline.
//!
//! A scripted source replays button presses against the real clock while
//! the sampler, classifier, and dispatcher are wired together the same way
//! the agent binary wires them. Timings use millisecond-scale windows with
//! generous margins relative to the sample period.

use crossbeam_channel::RecvTimeoutError;
use presswatch::{
    core::{Classifier, PressPattern},
    dispatch::Dispatcher,
    sampler::Sampler,
    source::{Level, ScriptedSource},
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const SAMPLE_PERIOD: Duration = Duration::from_millis(2);
const MULTI_PRESS_INTERVAL: Duration = Duration::from_millis(80);
const HOLD_THRESHOLD: Duration = Duration::from_millis(200);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Record every dispatched pattern into a shared vector.
fn recording_dispatcher() -> (Dispatcher, Arc<Mutex<Vec<PressPattern>>>) {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = Dispatcher::new();
    for pattern in PressPattern::all() {
        let sink = observed.clone();
        dispatcher.register(
            pattern,
            Box::new(move || {
                sink.lock().unwrap().push(pattern);
                Ok(())
            }),
        );
    }
    (dispatcher, observed)
}

/// Drive the full pipeline over `source` for `run_for`, the way the agent
/// binary does: samples feed `observe`, timeouts feed `poll`, and a
/// terminal classification ends the run early.
fn run_pipeline(
    source: ScriptedSource,
    sample_period: Duration,
    run_for: Duration,
) -> Vec<PressPattern> {
    let (mut dispatcher, observed) = recording_dispatcher();
    let mut classifier = Classifier::new(MULTI_PRESS_INTERVAL, HOLD_THRESHOLD);

    let mut sampler = Sampler::new(sample_period);
    sampler.start(source).expect("sampler start");
    let receiver = sampler.receiver().clone();

    let deadline = Instant::now() + run_for;
    while Instant::now() < deadline {
        let classified = match receiver.recv_timeout(sample_period) {
            Ok(Ok(sample)) => classifier.observe(sample.level, sample.at),
            Ok(Err(e)) => panic!("source read failed: {e}"),
            Err(RecvTimeoutError::Timeout) => classifier.poll(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if let Some(pattern) = classified {
            dispatcher.dispatch(pattern).expect("dispatch");
            if pattern.is_terminal() {
                break;
            }
        }
    }
    sampler.stop();

    let result = observed.lock().unwrap().clone();
    result
}

#[test]
fn single_short_press_classifies_once() {
    let source = ScriptedSource::with_presses(&[(ms(10), ms(40))]);
    let observed = run_pipeline(source, SAMPLE_PERIOD, ms(300));
    assert_eq!(observed, vec![PressPattern::OneShort]);
}

#[test]
fn double_press_never_splits_into_two_singles() {
    // Release-to-press gap of 30ms, well inside the 80ms interval.
    let source = ScriptedSource::with_presses(&[(ms(10), ms(40)), (ms(70), ms(100))]);
    let observed = run_pipeline(source, SAMPLE_PERIOD, ms(350));
    assert_eq!(observed, vec![PressPattern::TwoShort]);
}

#[test]
fn five_presses_saturate_to_many() {
    let presses: Vec<(Duration, Duration)> = (0..5)
        .map(|i| (ms(10 + i * 60), ms(10 + i * 60 + 30)))
        .collect();
    let source = ScriptedSource::with_presses(&presses);
    let observed = run_pipeline(source, SAMPLE_PERIOD, ms(700));
    assert_eq!(observed, vec![PressPattern::ManyShort]);
}

#[test]
fn hold_escalates_before_release_and_ends_the_run() {
    // Asserted from 10ms on, never released.
    let source = ScriptedSource::new(vec![(ms(10), Level::Asserted)]);
    let started = Instant::now();
    let observed = run_pipeline(source, SAMPLE_PERIOD, ms(800));

    assert_eq!(observed, vec![PressPattern::Hold]);
    // The run ended at the threshold, not at the deadline.
    assert!(started.elapsed() < ms(700));
}

#[test]
fn press_inside_one_sample_gap_is_invisible() {
    // With a 150ms sample period, a press spanning 40..70ms falls strictly
    // between the first read (at startup) and the second (~150ms): the
    // sampler cannot resolve it, by construction.
    let source = ScriptedSource::with_presses(&[(ms(40), ms(70))]);
    let observed = run_pipeline(source, ms(150), ms(450));
    assert_eq!(observed, Vec::<PressPattern>::new());
}
