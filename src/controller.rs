//! Owned worker and channel for hosted (`std`) targets.
//!
//! [`PeriodicOutput`] creates the channel and the engine together, runs the
//! worker loop on a dedicated thread once [`start`](PeriodicOutput::start)
//! is called, and stops and joins that thread exactly once, either through
//! [`stop`](PeriodicOutput::stop) or on drop.
//!
//! The channel and stop signal are the only shared state. Engine state moves
//! into the worker thread and comes back as an [`EngineSnapshot`] on stop.

use std::sync::Arc;
use std::thread::JoinHandle;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use futures_lite::future::block_on;

use crate::channel::{CommandChannel, DEFAULT_CHANNEL_DEPTH, EnqueueError};
use crate::command::Command;
use crate::engine::{DebugHook, Engine, EngineSnapshot, NoDebugHook};
use crate::output::Output;
use crate::runner::{StopSignal, run};
use crate::time::{EmbassyDelay, TickDelay};

/// Smallest stack given to a hosted worker thread, in bytes.
pub const MIN_HOSTED_STACK_SIZE: usize = 64 * 1024;

/// Worker task parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Thread name.
    pub name: &'static str,

    /// Requested stack size in bytes. Raised to [`MIN_HOSTED_STACK_SIZE`] on
    /// hosted targets.
    pub stack_size: usize,

    /// Scheduler priority. Hosted threads cannot be prioritized, so this is
    /// only reported.
    pub priority: u8,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "periodic-output",
            stack_size: 3072,
            priority: 2,
        }
    }
}

impl WorkerConfig {
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

/// Errors returned by [`PeriodicOutput::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// [`PeriodicOutput::start`] was called on an instance that already
    /// started its worker.
    AlreadyStarted,

    /// The worker thread could not be created.
    SpawnFailed,
}

impl core::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControllerError::AlreadyStarted => {
                write!(f, "worker already started")
            }
            ControllerError::SpawnFailed => {
                write!(f, "failed to spawn worker thread")
            }
        }
    }
}

impl std::error::Error for ControllerError {}

struct Shared<const N: usize> {
    channel: CommandChannel<CriticalSectionRawMutex, N>,
    stop: StopSignal<CriticalSectionRawMutex>,
}

/// Cloneable handle for enqueuing commands from other threads.
///
/// Keeps the channel alive on its own, so enqueuing after the controller was
/// dropped is safe; the command is queued with nobody to drain it, or
/// rejected with [`EnqueueError::ChannelFull`].
#[derive(Clone)]
pub struct CommandSender<const N: usize = DEFAULT_CHANNEL_DEPTH> {
    shared: Arc<Shared<N>>,
}

impl<const N: usize> CommandSender<N> {
    /// Copies `cmd` into the channel without blocking.
    pub fn enqueue(&self, cmd: Command) -> Result<(), EnqueueError> {
        self.shared.channel.enqueue(cmd)
    }
}

/// Configures a [`PeriodicOutput`] before it is built.
pub struct Builder<O, H = NoDebugHook, D = EmbassyDelay> {
    output: O,
    hook: H,
    delay: D,
}

impl<O: Output> Builder<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            hook: NoDebugHook,
            delay: EmbassyDelay,
        }
    }
}

impl<O: Output, H: DebugHook, D: TickDelay> Builder<O, H, D> {
    /// Sets the hook notified on every accepted command.
    pub fn debug_hook<H2: DebugHook>(self, hook: H2) -> Builder<O, H2, D> {
        Builder {
            output: self.output,
            hook,
            delay: self.delay,
        }
    }

    /// Replaces the tick delay (defaults to [`EmbassyDelay`]).
    pub fn delay<D2: TickDelay>(self, delay: D2) -> Builder<O, H, D2> {
        Builder {
            output: self.output,
            hook: self.hook,
            delay,
        }
    }

    /// Builds a controller whose channel holds `N` commands.
    ///
    /// `N` must be at least 1; a zero depth does not compile.
    pub fn build<const N: usize>(self) -> PeriodicOutput<O, H, D, N> {
        let engine = Engine::new(self.output).with_debug_hook(self.hook);
        PeriodicOutput {
            shared: Arc::new(Shared {
                channel: CommandChannel::new(),
                stop: StopSignal::new(),
            }),
            idle: Some((engine, self.delay)),
            worker: None,
        }
    }
}

/// A periodic output controller with its own worker thread.
///
/// # Type Parameters
/// * `O` - Output implementation
/// * `H` - Debug hook implementation
/// * `D` - Tick delay implementation
/// * `N` - Channel depth
pub struct PeriodicOutput<O, H = NoDebugHook, D = EmbassyDelay, const N: usize = DEFAULT_CHANNEL_DEPTH>
where
    O: Output,
    H: DebugHook,
{
    shared: Arc<Shared<N>>,
    idle: Option<(Engine<O, H>, D)>,
    worker: Option<JoinHandle<EngineSnapshot>>,
}

impl<O: Output> PeriodicOutput<O> {
    /// Creates a controller with a channel depth of [`DEFAULT_CHANNEL_DEPTH`].
    pub fn new(output: O) -> Self {
        Builder::new(output).build()
    }

    /// Starts configuring a controller.
    pub fn builder(output: O) -> Builder<O> {
        Builder::new(output)
    }
}

impl<O, H, D, const N: usize> PeriodicOutput<O, H, D, N>
where
    O: Output + Send + 'static,
    H: DebugHook + Send + 'static,
    D: TickDelay + Send + 'static,
{
    /// Spawns the worker thread.
    ///
    /// Fails with [`ControllerError::AlreadyStarted`] if the worker was
    /// started before; no second thread is created. If spawning fails the
    /// instance cannot be started again.
    pub fn start(&mut self, config: WorkerConfig) -> Result<(), ControllerError> {
        let Some((mut engine, mut delay)) = self.idle.take() else {
            return Err(ControllerError::AlreadyStarted);
        };

        let stack_size = config.stack_size.max(MIN_HOSTED_STACK_SIZE);
        log::info!(
            "Spawning '{}' (pri={} advisory, stack={}B)",
            config.name,
            config.priority,
            stack_size
        );

        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name(config.name.into())
            .stack_size(stack_size)
            .spawn(move || {
                block_on(run(&mut engine, &shared.channel, &mut delay, &shared.stop));
                log::info!("periodic output worker stopped");
                engine.snapshot()
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                log::error!("periodic output: spawning '{}' failed: {}", config.name, err);
                Err(ControllerError::SpawnFailed)
            }
        }
    }
}

impl<O, H, D, const N: usize> PeriodicOutput<O, H, D, N>
where
    O: Output,
    H: DebugHook,
{
    /// Copies `cmd` into the channel without blocking.
    ///
    /// Commands enqueued before [`start`](Self::start) wait in the channel.
    pub fn enqueue(&self, cmd: Command) -> Result<(), EnqueueError> {
        self.shared.channel.enqueue(cmd)
    }

    /// Returns a handle other threads can enqueue through.
    pub fn sender(&self) -> CommandSender<N> {
        CommandSender {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of commands waiting in the channel.
    pub fn pending(&self) -> usize {
        self.shared.channel.len()
    }

    /// Whether a worker thread has been started and has not yet exited.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// Returns the final engine state, or `None` if no worker was running or
    /// it panicked. Calling it again is a no-op.
    pub fn stop(&mut self) -> Option<EngineSnapshot> {
        let handle = self.worker.take()?;
        self.shared.stop.signal(());
        match handle.join() {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                log::error!("periodic output worker panicked");
                None
            }
        }
    }
}

impl<O, H, D, const N: usize> Drop for PeriodicOutput<O, H, D, N>
where
    O: Output,
    H: DebugHook,
{
    fn drop(&mut self) {
        self.stop();
    }
}
