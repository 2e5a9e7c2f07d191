//! The worker loop.
//!
//! [`run`] is the body of the worker task: it owns the engine for its whole
//! lifetime, waits on the channel as the engine asks, and hands each result
//! to [`Engine::step`]. On bare-metal targets spawn it from an embassy task;
//! the `std` [`PeriodicOutput`](crate::PeriodicOutput) runs it on a thread.

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::channel::CommandChannel;
use crate::engine::{DebugHook, Engine};
use crate::output::Output;
use crate::time::{TickDelay, Timeout};

/// Signal that asks a running worker to return.
pub type StopSignal<M> = Signal<M, ()>;

/// Runs the engine until `stop` is signaled.
///
/// The output is first driven to the engine's steady level so the line
/// matches the initial `SwitchOff` state. `stop` is honored at every wait
/// point and also cuts short a command that is mid-execution. A command cut
/// short is resumed from and the steady level re-asserted, so the worker
/// always exits with a steady `current` and the output at `output_state`.
pub async fn run<M, O, H, D, const N: usize>(
    engine: &mut Engine<O, H>,
    channel: &CommandChannel<M, N>,
    delay: &mut D,
    stop: &StopSignal<M>,
) where
    M: RawMutex,
    O: Output,
    H: DebugHook,
    D: TickDelay,
{
    engine.sync_output();

    loop {
        let received = match engine.wait_timeout() {
            Timeout::Immediate => {
                if stop.signaled() {
                    break;
                }
                channel.receive(Timeout::Immediate).await
            }
            timeout => match select(channel.receive(timeout), stop.wait()).await {
                Either::First(received) => received,
                Either::Second(()) => break,
            },
        };

        let outcome = select(engine.step(received, delay), stop.wait()).await;
        if let Either::Second(()) = outcome {
            engine.resume();
            engine.sync_output();
            break;
        }
    }
}
