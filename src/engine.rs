//! Command-interpreting state machine for a single boolean output.
//!
//! Provides [`Engine`], which owns the output together with the current and
//! previous commands, and executes one command pass per [`Engine::step`].
//! The engine never touches the channel itself; the worker loop in
//! [`crate::runner`] feeds it whatever the channel delivered.
//!
//! # Rules
//!
//! - A command of the same kind as the current one is dropped when that kind
//!   is `SwitchOff`, `SwitchOn` or `PulsedPerpetual` (debounce).
//! - Transient kinds (`ContinuousOn`, `ContinuousOff`, `Pulsed`) run once and
//!   then the command they replaced becomes current again (resumption).
//! - Transient kinds restore the steady output level when they finish.

use core::fmt::Write;

use crate::command::{Command, CommandKind};
use crate::output::Output;
use crate::time::{TickDelay, Timeout};

/// Capacity of the transition message passed to a [`DebugHook`].
pub const DEBUG_MESSAGE_CAPACITY: usize = 64;

/// Receives a short text whenever the engine accepts a new command.
///
/// Any `FnMut(&str)` closure is a `DebugHook`.
pub trait DebugHook {
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> DebugHook for F {
    #[inline]
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

/// Hook that ignores every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDebugHook;

impl DebugHook for NoDebugHook {
    #[inline]
    fn notify(&mut self, _message: &str) {}
}

/// Point-in-time copy of the engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineSnapshot {
    /// Steady output level last asserted.
    pub output_state: bool,
    /// Command governing the output.
    pub current: Command,
    /// Command resumed after a transient `current` finishes.
    pub previous: Command,
}

/// Drives one output according to the command stream.
///
/// # Type Parameters
/// * `O` - Output implementation
/// * `H` - Debug hook implementation (defaults to [`NoDebugHook`])
pub struct Engine<O: Output, H: DebugHook = NoDebugHook> {
    output: O,
    hook: H,
    output_state: bool,
    current: Command,
    previous: Command,
}

impl<O: Output> Engine<O> {
    /// Creates an engine in the `SwitchOff` state.
    ///
    /// The output is not driven until the first command executes or
    /// [`Engine::sync_output`] is called.
    pub fn new(output: O) -> Self {
        Self {
            output,
            hook: NoDebugHook,
            output_state: false,
            current: Command::default(),
            previous: Command::default(),
        }
    }
}

impl<O: Output, H: DebugHook> Engine<O, H> {
    /// Replaces the debug hook.
    pub fn with_debug_hook<H2: DebugHook>(self, hook: H2) -> Engine<O, H2> {
        Engine {
            output: self.output,
            hook,
            output_state: self.output_state,
            current: self.current,
            previous: self.previous,
        }
    }

    /// How long the worker may wait for the next command.
    ///
    /// Perpetual toggling must keep its own deadline, so it only polls.
    pub fn wait_timeout(&self) -> Timeout {
        if self.current.kind == CommandKind::PulsedPerpetual {
            Timeout::Immediate
        } else {
            Timeout::Forever
        }
    }

    /// Whether `cmd` repeats the active steady command and should be dropped.
    pub fn is_debounced(&self, cmd: &Command) -> bool {
        cmd.kind == self.current.kind && cmd.kind.is_steady()
    }

    /// Makes `cmd` the current command unless it is debounced.
    ///
    /// Returns `false` if the command was dropped. On acceptance the debug
    /// hook is notified and the superseded command becomes `previous`.
    pub fn accept(&mut self, cmd: Command) -> bool {
        if self.is_debounced(&cmd) {
            return false;
        }

        let mut message = heapless::String::<DEBUG_MESSAGE_CAPACITY>::new();
        // The longest pair of kind names is well under the capacity.
        let written = write!(message, "{} -> {}", self.current.kind, cmd.kind);
        debug_assert!(written.is_ok(), "transition message exceeds DEBUG_MESSAGE_CAPACITY");
        log::debug!("periodic output: {}", message.as_str());
        self.hook.notify(&message);

        self.previous = self.current;
        self.current = cmd;
        true
    }

    /// Runs one pass of the current command.
    pub async fn execute<D: TickDelay>(&mut self, delay: &mut D) {
        let cmd = self.current;
        match cmd.kind {
            CommandKind::SwitchOn => {
                self.output.set(true);
                self.output_state = true;
            }
            CommandKind::ContinuousOn => {
                self.output.set(true);
                delay.delay_ticks(cmd.on_duration).await;
                self.output.set(self.output_state);
            }
            CommandKind::ContinuousOff => {
                self.output.set(false);
                delay.delay_ticks(cmd.off_duration).await;
                self.output.set(self.output_state);
            }
            CommandKind::Pulsed => {
                for _ in 0..cmd.cycles {
                    self.output.set(true);
                    delay.delay_ticks(cmd.on_duration).await;
                    self.output.set(false);
                    delay.delay_ticks(cmd.off_duration).await;
                }
                self.output.set(self.output_state);
            }
            CommandKind::PulsedPerpetual => {
                self.output_state = !self.output_state;
                self.output.set(self.output_state);
                let phase = if self.output_state {
                    cmd.on_duration
                } else {
                    cmd.off_duration
                };
                delay.delay_ticks(phase).await;
            }
            CommandKind::SwitchOff => {
                self.output.set(false);
                self.output_state = false;
            }
        }
    }

    /// Returns to `previous` if the current command is transient.
    pub fn resume(&mut self) {
        if self.current.kind.is_transient() {
            self.current = self.previous;
        }
    }

    /// Processes what the wait produced: accept, execute, resume.
    ///
    /// Returns `false` when `received` was debounced; nothing is executed in
    /// that case so a repeated steady command never re-drives the output.
    pub async fn step<D: TickDelay>(&mut self, received: Option<Command>, delay: &mut D) -> bool {
        if let Some(cmd) = received {
            if !self.accept(cmd) {
                return false;
            }
        }
        self.execute(delay).await;
        self.resume();
        true
    }

    /// Asserts the steady output level without changing any state.
    pub fn sync_output(&mut self) {
        self.output.set(self.output_state);
    }

    /// Returns the command currently governing the output.
    pub fn current(&self) -> Command {
        self.current
    }

    /// Returns the command that a transient `current` will resume.
    pub fn previous(&self) -> Command {
        self.previous
    }

    /// Returns the steady output level last asserted.
    pub fn output_state(&self) -> bool {
        self.output_state
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            output_state: self.output_state,
            current: self.current,
            previous: self.previous,
        }
    }
}
