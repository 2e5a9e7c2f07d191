//! Bounded multi-producer command channel.
//!
//! A thin wrapper around `embassy_sync::channel::Channel` that never blocks
//! producers and lets the single consumer choose how long to wait.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_time::with_timeout;

use crate::command::Command;
use crate::time::{Timeout, duration_from_ticks};

/// Default number of queued commands.
pub const DEFAULT_CHANNEL_DEPTH: usize = 8;

/// Errors returned by [`CommandChannel::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnqueueError {
    /// No free slot; the command was dropped.
    ChannelFull,
}

impl core::fmt::Display for EnqueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EnqueueError::ChannelFull => write!(f, "command channel is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EnqueueError {}

/// FIFO of commands with room for `N` entries.
///
/// Any number of producers may call [`enqueue`](Self::enqueue) concurrently
/// (given a mutex type `M` that is `Sync`, e.g. `CriticalSectionRawMutex`);
/// exactly one consumer should call [`receive`](Self::receive).
///
/// # Type Parameters
/// * `M` - Raw mutex guarding the queue
/// * `N` - Capacity
pub struct CommandChannel<M: RawMutex, const N: usize> {
    inner: Channel<M, Command, N>,
}

impl<M: RawMutex, const N: usize> CommandChannel<M, N> {
    /// Creates an empty channel. Usable in `static` items.
    ///
    /// A zero capacity is rejected at compile time:
    ///
    /// ```compile_fail
    /// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    /// use periodic_output::CommandChannel;
    ///
    /// let channel = CommandChannel::<NoopRawMutex, 0>::new();
    /// ```
    pub const fn new() -> Self {
        const { assert!(N > 0, "command channel depth must be at least 1") };
        Self {
            inner: Channel::new(),
        }
    }

    /// Copies `cmd` into the channel without waiting.
    ///
    /// Fails with [`EnqueueError::ChannelFull`] when every slot is taken;
    /// queued commands are left as they were.
    pub fn enqueue(&self, cmd: Command) -> Result<(), EnqueueError> {
        self.inner.try_send(cmd).map_err(|_: TrySendError<Command>| {
            log::warn!("periodic output: channel full, dropping {}", cmd.kind);
            EnqueueError::ChannelFull
        })
    }

    /// Takes the oldest command, waiting according to `timeout`.
    ///
    /// Returns `None` if nothing arrived in time.
    pub async fn receive(&self, timeout: Timeout) -> Option<Command> {
        match timeout {
            Timeout::Forever => Some(self.inner.receive().await),
            Timeout::Immediate => self.inner.try_receive().ok(),
            Timeout::Ticks(ticks) => with_timeout(duration_from_ticks(ticks), self.inner.receive())
                .await
                .ok(),
        }
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Maximum number of queued commands.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for CommandChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
