//! Tick-based timing used by the engine.
//!
//! A tick is the unit of the underlying timer. With the bundled
//! [`EmbassyDelay`] it is an `embassy_time` tick, so the tick rate is whatever
//! the embedding application configured for `embassy-time`.

use embassy_time::{Duration, Timer};

/// Duration in timer ticks.
pub type Ticks = u32;

/// How long a receive may wait for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Wait until a command arrives.
    Forever,

    /// Do not wait; take a command only if one is already queued.
    Immediate,

    /// Wait at most this many ticks.
    Ticks(Ticks),
}

/// Cooperative delay measured in ticks.
///
/// Implementations must yield to the scheduler while waiting rather than spin.
#[allow(async_fn_in_trait)]
pub trait TickDelay {
    /// Suspends the caller for `ticks` ticks.
    async fn delay_ticks(&mut self, ticks: Ticks);
}

/// [`TickDelay`] backed by `embassy_time::Timer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyDelay;

impl TickDelay for EmbassyDelay {
    async fn delay_ticks(&mut self, ticks: Ticks) {
        Timer::after_ticks(u64::from(ticks)).await;
    }
}

/// Converts milliseconds to ticks of the configured `embassy-time` tick rate.
///
/// Saturates at `Ticks::MAX`.
pub fn ticks_from_millis(millis: u32) -> Ticks {
    let ticks = Duration::from_millis(u64::from(millis)).as_ticks();
    Ticks::try_from(ticks).unwrap_or(Ticks::MAX)
}

/// Converts a tick count back to an `embassy_time::Duration`.
#[inline]
pub fn duration_from_ticks(ticks: Ticks) -> Duration {
    Duration::from_ticks(u64::from(ticks))
}
