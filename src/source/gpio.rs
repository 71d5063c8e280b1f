//! Linux implementation of the button signal source using a GPIO line.
//!
//! The line is opened through `rppal` as a pull-up input, so an idle line
//! reads high and a pressed button (wired to ground) reads low. The pin is
//! reset and released when the source is dropped.

use crate::source::types::{Level, SignalSource, SourceError};
use rppal::gpio::{Gpio, InputPin};
use std::path::Path;

/// Settings for the GPIO line backing the button.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// BCM pin number
    pub pin: u8,
    /// Whether the line reads low when the button is pressed
    pub active_low: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            pin: 16,
            active_low: true,
        }
    }
}

/// A button source backed by a GPIO input pin.
pub struct GpioSource {
    pin: InputPin,
    active_low: bool,
}

impl GpioSource {
    /// Acquire the configured line as a pull-up input.
    pub fn new(config: &LineConfig) -> Result<Self, SourceError> {
        let gpio = Gpio::new().map_err(|e| SourceError::Acquire(e.to_string()))?;
        let pin = gpio
            .get(config.pin)
            .map_err(|e| SourceError::Acquire(format!("pin {}: {e}", config.pin)))?
            .into_input_pullup();

        Ok(Self {
            pin,
            active_low: config.active_low,
        })
    }

    /// BCM number of the acquired pin.
    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl SignalSource for GpioSource {
    fn read_level(&mut self) -> Result<Level, SourceError> {
        let pressed = if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        };
        Ok(if pressed {
            Level::Asserted
        } else {
            Level::Released
        })
    }
}

/// Check whether GPIO line access is available on this host.
pub fn check_line_access() -> bool {
    Path::new("/dev/gpiomem").exists() || Path::new("/dev/gpiochip0").exists()
}
