#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Command`**: One requested behavior (`CommandKind` plus on/off durations and a cycle count)
//! - **`CommandKind`**: Steady (`SwitchOff`, `SwitchOn`, `PulsedPerpetual`) or transient (`ContinuousOff`, `ContinuousOn`, `Pulsed`)
//! - **`Engine`**: State machine that owns the output and the current/previous commands
//! - **`CommandChannel`**: Bounded FIFO that producers enqueue into without blocking
//! - **`run`**: Worker loop that feeds channel contents to the engine until stopped
//! - **`Output`**: Trait to implement for the controlled line (any `FnMut(bool)` works)
//! - **`TickDelay`**: Trait for cooperative tick delays (`EmbassyDelay` by default)
//! - **`PeriodicOutput`**: (`std`) Engine, channel and worker thread bundled as one owned value
//!
//! Durations are in ticks of the `embassy-time` tick rate; use
//! [`ticks_from_millis`] to convert.

pub mod channel;
pub mod command;
pub mod engine;
pub mod output;
pub mod runner;
pub mod time;

#[cfg(feature = "std")]
pub mod controller;

pub use channel::{CommandChannel, DEFAULT_CHANNEL_DEPTH, EnqueueError};
pub use command::{Command, CommandKind, RawCommand};
pub use engine::{DebugHook, Engine, EngineSnapshot, NoDebugHook};
pub use output::{Output, PinOutput};
pub use runner::{StopSignal, run};
pub use time::{EmbassyDelay, TickDelay, Ticks, Timeout, ticks_from_millis};

#[cfg(feature = "std")]
pub use controller::{
    Builder, CommandSender, ControllerError, MIN_HOSTED_STACK_SIZE, PeriodicOutput, WorkerConfig,
};
