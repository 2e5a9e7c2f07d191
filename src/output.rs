//! The boolean output the engine drives.

use embedded_hal::digital::OutputPin;

/// Trait for abstracting the controlled output.
///
/// Implement this for whatever the engine switches (GPIO, relay driver, a
/// register bit). Calls come from the worker's own context, possibly in quick
/// succession, and cannot fail - handle any hardware errors internally.
///
/// Any `FnMut(bool)` closure is an `Output`.
pub trait Output {
    /// Drives the output high (`true`) or low (`false`).
    fn set(&mut self, on: bool);
}

impl<F: FnMut(bool)> Output for F {
    #[inline]
    fn set(&mut self, on: bool) {
        self(on)
    }
}

/// Adapts an `embedded-hal` [`OutputPin`] to [`Output`].
///
/// Pin errors are dropped; a pin that fails to switch simply keeps its level.
#[derive(Debug)]
pub struct PinOutput<P> {
    pin: P,
    active_low: bool,
}

impl<P: OutputPin> PinOutput<P> {
    /// Wraps a pin where `true` means electrically high.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Wraps a pin where `true` means electrically low (e.g. LED to VCC).
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Output for PinOutput<P> {
    fn set(&mut self, on: bool) {
        let _ = if on != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}
