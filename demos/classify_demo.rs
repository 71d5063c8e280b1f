//! Demonstration of the presswatch classification pipeline.
//!
//! This example shows how to:
//! 1. Script a sequence of button presses
//! 2. Start the sampler over the scripted source
//! 3. Feed samples to the classifier
//! 4. Dispatch classified events to actions
//!
//! Run with: cargo run --example classify_demo
//!
//! No hardware is required; a scripted source replays a single press, a
//! double press, and a hold.

use crossbeam_channel::RecvTimeoutError;
use presswatch::{
    core::{Classifier, PressPattern},
    dispatch::Dispatcher,
    sampler::Sampler,
    source::{Level, ScriptedSource},
};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn main() {
    println!("Presswatch - Classification Demo");
    println!("================================");
    println!();

    // Timings scaled down so the demo finishes in a few seconds.
    let sample_period = ms(5);
    let multi_press_interval = ms(150);
    let hold_threshold = ms(600);

    // One short press, a double press, then a hold.
    let source = ScriptedSource::new(vec![
        (ms(100), Level::Asserted),
        (ms(160), Level::Released),
        (ms(600), Level::Asserted),
        (ms(660), Level::Released),
        (ms(720), Level::Asserted),
        (ms(780), Level::Released),
        (ms(1_300), Level::Asserted),
    ]);

    let mut dispatcher = Dispatcher::new();
    for pattern in PressPattern::all() {
        dispatcher.register(
            pattern,
            Box::new(move || {
                println!("  -> action invoked for {pattern}");
                Ok(())
            }),
        );
    }

    let mut classifier = Classifier::new(multi_press_interval, hold_threshold);
    let mut sampler = Sampler::new(sample_period);
    sampler.start(source).expect("sampler start");
    let receiver = sampler.receiver().clone();

    println!("Classifying scripted presses...");
    println!();

    let deadline = Instant::now() + ms(3_000);
    while Instant::now() < deadline {
        let classified = match receiver.recv_timeout(sample_period) {
            Ok(Ok(sample)) => classifier.observe(sample.level, sample.at),
            Ok(Err(e)) => {
                eprintln!("source read failed: {e}");
                break;
            }
            Err(RecvTimeoutError::Timeout) => classifier.poll(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if let Some(pattern) = classified {
            println!("Classified: {pattern}");
            if let Err(e) = dispatcher.dispatch(pattern) {
                eprintln!("  dispatch failed: {e}");
            }
            if pattern.is_terminal() {
                println!();
                println!("Hold reached - ending the run.");
                break;
            }
        }
    }

    sampler.stop();
    println!();
    println!("Demo complete!");
}
