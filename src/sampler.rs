//! Fixed-cadence sampling of the button signal source.
//!
//! The sampler polls the source on a background thread once per
//! `sample_period` and pushes every observation over a bounded channel.
//! The single consumer on the other end feeds the classifier, so all
//! classification state is mutated from one place. The thread checks its
//! running flag every iteration, so cancellation latency is bounded by one
//! sample period; the source is dropped when the thread exits, releasing
//! the line on every exit path.
//!
//! The sampler cannot see presses shorter than `sample_period`. That is a
//! resolution limit of the polling design, not a defect.

use crate::source::{LevelSample, SignalSource, SourceError};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Errors that can occur while driving the sampler.
#[derive(Debug)]
pub enum SamplerError {
    AlreadyRunning,
}

impl std::fmt::Display for SamplerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplerError::AlreadyRunning => write!(f, "Sampler is already running"),
        }
    }
}

impl std::error::Error for SamplerError {}

/// A background polling loop over a button signal source.
pub struct Sampler {
    sample_period: Duration,
    sender: Sender<Result<LevelSample, SourceError>>,
    receiver: Receiver<Result<LevelSample, SourceError>>,
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Create a sampler polling at the given period.
    pub fn new(sample_period: Duration) -> Self {
        // Bounded so a stalled consumer cannot grow memory without limit.
        let (sender, receiver) = bounded(4_096);

        Self {
            sample_period,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Start polling `source` in a background thread.
    ///
    /// The source moves into the thread and is dropped when it exits.
    /// Returns an error if the sampler is already running.
    pub fn start<S>(&mut self, source: S) -> Result<(), SamplerError>
    where
        S: SignalSource + Send + 'static,
    {
        if self.running.load(Ordering::SeqCst) {
            return Err(SamplerError::AlreadyRunning);
        }

        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        let period = self.sample_period;

        let handle = thread::spawn(move || {
            run_poll_loop(source, sender, running.clone(), period);
            running.store(false, Ordering::SeqCst);
        });

        self.thread_handle = Some(handle);
        Ok(())
    }

    /// Stop polling and join the thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            // The thread exits within one sample period of the flag flip
            let _ = handle.join();
        }
    }

    /// Check if the sampler is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The receiver for level samples (and forwarded read errors).
    pub fn receiver(&self) -> &Receiver<Result<LevelSample, SourceError>> {
        &self.receiver
    }

    /// The configured sample period.
    pub fn sample_period(&self) -> Duration {
        self.sample_period
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Poll the source until cancelled or a read fails.
///
/// A read error is forwarded over the channel and ends the loop; the
/// consumer decides whether to retry with a fresh source or abort.
///
/// Sends never block: when the consumer falls behind and the channel
/// fills, the sample is dropped instead, since only the most recent
/// level matters. A blocking send here would pin the thread and make
/// `stop()` wait on a stalled consumer.
fn run_poll_loop<S: SignalSource>(
    mut source: S,
    sender: Sender<Result<LevelSample, SourceError>>,
    running: Arc<AtomicBool>,
    period: Duration,
) {
    while running.load(Ordering::SeqCst) {
        match source.read_level() {
            Ok(level) => {
                let sample = LevelSample {
                    level,
                    at: Instant::now(),
                };
                if let Err(TrySendError::Disconnected(_)) = sender.try_send(Ok(sample)) {
                    break;
                }
            }
            Err(e) => {
                let _ = sender.try_send(Err(e));
                break;
            }
        }
        thread::sleep(period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Level, ScriptedSource};

    #[test]
    fn test_start_twice_fails() {
        let mut sampler = Sampler::new(Duration::from_millis(5));
        sampler
            .start(ScriptedSource::new(vec![]))
            .expect("first start");

        let err = sampler.start(ScriptedSource::new(vec![]));
        assert!(matches!(err, Err(SamplerError::AlreadyRunning)));

        sampler.stop();
        assert!(!sampler.is_running());
    }

    #[test]
    fn test_samples_arrive_at_cadence() {
        let mut sampler = Sampler::new(Duration::from_millis(2));
        sampler
            .start(ScriptedSource::new(vec![(
                Duration::from_millis(0),
                Level::Asserted,
            )]))
            .expect("start");

        let mut seen = 0;
        for _ in 0..5 {
            let sample = sampler
                .receiver()
                .recv_timeout(Duration::from_millis(200))
                .expect("sample within timeout")
                .expect("no read error");
            assert_eq!(sample.level, Level::Asserted);
            seen += 1;
        }
        assert_eq!(seen, 5);

        sampler.stop();
    }

    #[test]
    fn test_stop_returns_while_channel_is_full() {
        // No consumer: the polling thread fills the bounded channel and
        // must keep running (dropping samples) rather than block in send,
        // or stop() would never join it.
        let mut sampler = Sampler::new(Duration::from_micros(10));
        sampler
            .start(ScriptedSource::new(vec![(
                Duration::from_millis(0),
                Level::Asserted,
            )]))
            .expect("start");

        let deadline = Instant::now() + Duration::from_secs(5);
        while !sampler.receiver().is_full() {
            assert!(Instant::now() < deadline, "channel never filled");
            thread::sleep(Duration::from_millis(1));
        }

        let (done_tx, done_rx) = bounded(1);
        let handle = thread::spawn(move || {
            sampler.stop();
            let _ = done_tx.send(());
        });

        done_rx
            .recv_timeout(Duration::from_secs(3))
            .expect("stop() should return despite the full channel");
        handle.join().expect("stop thread");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut sampler = Sampler::new(Duration::from_millis(5));
        sampler.start(ScriptedSource::new(vec![])).expect("start");
        sampler.stop();
        sampler.stop();
        assert!(!sampler.is_running());
    }
}
