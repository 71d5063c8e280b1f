//! Presswatch CLI
//!
//! Press-pattern classifier agent for a single physical button.

use clap::{Parser, Subcommand};
use presswatch::{
    config::Config,
    core::{Classifier, PressPattern},
    dispatch::{DispatchError, Dispatcher},
    sampler::Sampler,
    source::{check_line_access, ButtonSource, LineConfig},
    telemetry::create_shared_log_with_persistence,
    VERSION,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "presswatch")]
#[command(version = VERSION)]
#[command(about = "Press-pattern classifier agent for a single physical button", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start classifying button presses
    Run {
        /// BCM pin number of the button line (overrides config)
        #[arg(long)]
        pin: Option<u8>,

        /// Sample period in milliseconds (overrides config)
        #[arg(long)]
        sample_period_ms: Option<u64>,

        /// Multi-press window in milliseconds (overrides config)
        #[arg(long)]
        multi_press_interval_ms: Option<u64>,

        /// Hold threshold in milliseconds (overrides config)
        #[arg(long)]
        hold_threshold_ms: Option<u64>,
    },

    /// Pause classification
    Pause,

    /// Resume classification
    Resume,

    /// Show current agent status
    Status,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pin,
            sample_period_ms,
            multi_press_interval_ms,
            hold_threshold_ms,
        } => {
            cmd_run(pin, sample_period_ms, multi_press_interval_ms, hold_threshold_ms);
        }
        Commands::Pause => {
            cmd_pause();
        }
        Commands::Resume => {
            cmd_resume();
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_run(
    pin: Option<u8>,
    sample_period_ms: Option<u64>,
    multi_press_interval_ms: Option<u64>,
    hold_threshold_ms: Option<u64>,
) {
    println!("Presswatch v{VERSION}");
    println!();

    // Load or create configuration, then apply CLI overrides
    let mut config = Config::load().unwrap_or_default();
    if let Some(pin) = pin {
        config.line.pin = pin;
    }
    if let Some(ms) = sample_period_ms {
        config.sample_period = Duration::from_millis(ms);
    }
    if let Some(ms) = multi_press_interval_ms {
        config.multi_press_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = hold_threshold_ms {
        config.hold_threshold = Duration::from_millis(ms);
    }

    if !check_line_access() {
        eprintln!("Warning: no GPIO device found; line acquisition will likely fail.");
    }

    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    println!("Starting classification...");
    println!("  Line: BCM pin {} ({})", config.line.pin, if config.line.active_low {
        "active low"
    } else {
        "active high"
    });
    println!("  Sample period: {}ms", config.sample_period.as_millis());
    println!(
        "  Multi-press interval: {}ms",
        config.multi_press_interval.as_millis()
    );
    println!("  Hold threshold: {}ms", config.hold_threshold.as_millis());
    for pattern in PressPattern::all() {
        match config.actions.command_for(pattern) {
            Some(argv) => println!("  Action {pattern}: {}", argv.join(" ")),
            None => println!("  Action {pattern}: unbound"),
        }
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Set up telemetry
    let telemetry = create_shared_log_with_persistence(config.data_path.join("telemetry.json"));
    println!("Session ID: {}", telemetry.stats().session_id);

    // Build the dispatcher from configured actions
    let mut dispatcher = Dispatcher::new();
    for pattern in PressPattern::all() {
        if let Some(argv) = config.actions.command_for(pattern) {
            dispatcher.register_command(pattern, argv.clone());
        }
    }

    // Create the classifier and sampler
    let mut classifier = Classifier::new(config.multi_press_interval, config.hold_threshold);
    let mut sampler = Sampler::new(config.sample_period);

    let line_config = LineConfig {
        pin: config.line.pin,
        active_low: config.line.active_low,
    };

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    // Support pause/resume from another process by polling the config file.
    // If paused at startup, wait until resumed before acquiring the line.
    let mut paused = config.paused;
    let mut last_config_check = Instant::now();

    if paused {
        println!("Classification is currently paused.");
        println!("Run `presswatch resume` to start classifying.");
        println!();
    } else {
        match ButtonSource::new(&line_config) {
            Ok(source) => {
                if let Err(e) = sampler.start(source) {
                    eprintln!("Error starting sampler: {e}");
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error acquiring line: {e}");
                std::process::exit(1);
            }
        }
    }

    // Main classify loop
    let receiver = sampler.receiver().clone();
    let mut exit_code = 0;

    while running.load(Ordering::SeqCst) {
        // Periodically reload config so `presswatch pause/resume` can control a running agent.
        if last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(cfg) = Config::load() {
                if cfg.paused != paused {
                    paused = cfg.paused;

                    if paused {
                        println!();
                        println!("Pausing classification...");
                        sampler.stop();
                        classifier.reset();

                        // Drain any queued samples.
                        while receiver.try_recv().is_ok() {}
                    } else {
                        println!();
                        println!("Resuming classification...");
                        match ButtonSource::new(&line_config) {
                            Ok(source) => {
                                if let Err(e) = sampler.start(source) {
                                    eprintln!("Error resuming sampler: {e}");
                                    std::process::exit(1);
                                }
                            }
                            Err(e) => {
                                eprintln!("Error reacquiring line: {e}");
                                std::process::exit(1);
                            }
                        }
                    }
                }
            }
            last_config_check = Instant::now();
        }

        if paused {
            thread::sleep(Duration::from_millis(100));
            continue;
        }

        // Process samples, or poll for window expiry on timeout
        let classified = match receiver.recv_timeout(config.sample_period) {
            Ok(Ok(sample)) => classifier.observe(sample.level, sample.at),
            Ok(Err(e)) => {
                eprintln!("Signal source read failed: {e}");
                exit_code = 1;
                break;
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => classifier.poll(Instant::now()),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Sampler disconnected unexpectedly");
                exit_code = 1;
                break;
            }
        };

        if let Some(pattern) = classified {
            if pattern.is_terminal() {
                telemetry.record_hold();
                println!("[{pattern}] hold threshold reached");
            } else {
                telemetry.record_window_finalized();
                println!("[{pattern}] press window finalized");
            }

            match dispatcher.dispatch(pattern) {
                Ok(()) => telemetry.record_dispatch(),
                Err(DispatchError::NotRegistered(_)) => {
                    telemetry.record_dispatch_failure();
                    println!("[{pattern}] no action bound");
                }
                Err(e) => {
                    telemetry.record_dispatch_failure();
                    eprintln!("[{pattern}] {e}");
                }
            }

            // Hold ends the run regardless of the dispatch outcome.
            if pattern.is_terminal() {
                break;
            }
        }
    }

    // Stop sampling; the polling thread drops the source, releasing the line.
    println!();
    println!("Stopping classification...");
    sampler.stop();

    // Save telemetry
    if let Err(e) = telemetry.save() {
        eprintln!("Warning: Could not save telemetry: {e}");
    }

    // Final stats
    println!();
    println!("{}", telemetry.summary());

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn cmd_pause() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = true;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Classification paused. Use 'presswatch resume' to continue.");
}

fn cmd_resume() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = false;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Classification resumed.");
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Presswatch Status");
    println!("=================");
    println!();

    println!(
        "GPIO access: {}",
        if check_line_access() {
            "available"
        } else {
            "not available"
        }
    );
    println!();

    println!("Configuration:");
    println!("  Line: BCM pin {}", config.line.pin);
    println!("  Sample period: {}ms", config.sample_period.as_millis());
    println!(
        "  Multi-press interval: {}ms",
        config.multi_press_interval.as_millis()
    );
    println!("  Hold threshold: {}ms", config.hold_threshold.as_millis());
    println!("  Paused: {}", config.paused);
    println!();

    // Load and show telemetry stats if available
    let stats_path = config.data_path.join("telemetry.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(windows) = stats.get("windows_finalized") {
                    println!("  Press windows finalized: {windows}");
                }
                if let Some(holds) = stats.get("holds_detected") {
                    println!("  Holds detected: {holds}");
                }
                if let Some(dispatched) = stats.get("actions_dispatched") {
                    println!("  Actions dispatched: {dispatched}");
                }
                if let Some(failures) = stats.get("dispatch_failures") {
                    println!("  Dispatch failures: {failures}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
