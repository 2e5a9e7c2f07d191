//! Commands accepted by the periodic output worker.
//!
//! A [`Command`] is a small `Copy` value: a [`CommandKind`] plus the timing
//! parameters that kind needs. [`RawCommand`] is the fixed cross-boundary
//! layout (four `u32` fields) for handing commands over FFI or a byte link.

use crate::time::Ticks;

/// What the output should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum CommandKind {
    /// Drive the output low and keep it there.
    #[default]
    SwitchOff = 0,

    /// Drive the output high and keep it there.
    SwitchOn = 1,

    /// Drive low for `off_duration`, then restore the steady output.
    ContinuousOff = 2,

    /// Drive high for `on_duration`, then restore the steady output.
    ContinuousOn = 3,

    /// Emit `cycles` on/off pulses, then restore the steady output.
    Pulsed = 4,

    /// Toggle forever using `on_duration` / `off_duration` phases.
    PulsedPerpetual = 5,
}

impl CommandKind {
    /// Decodes a wire value. Unknown values fall back to `SwitchOff`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => CommandKind::SwitchOn,
            2 => CommandKind::ContinuousOff,
            3 => CommandKind::ContinuousOn,
            4 => CommandKind::Pulsed,
            5 => CommandKind::PulsedPerpetual,
            _ => CommandKind::SwitchOff,
        }
    }

    /// Wire value of this kind.
    #[inline]
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Steady kinds stay active until another command replaces them.
    #[inline]
    pub fn is_steady(self) -> bool {
        matches!(
            self,
            CommandKind::SwitchOff | CommandKind::SwitchOn | CommandKind::PulsedPerpetual
        )
    }

    /// Transient kinds run once, then the previous command is resumed.
    #[inline]
    pub fn is_transient(self) -> bool {
        !self.is_steady()
    }
}

impl core::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            CommandKind::SwitchOff => "SwitchOff",
            CommandKind::SwitchOn => "SwitchOn",
            CommandKind::ContinuousOff => "ContinuousOff",
            CommandKind::ContinuousOn => "ContinuousOn",
            CommandKind::Pulsed => "Pulsed",
            CommandKind::PulsedPerpetual => "PulsedPerpetual",
        };
        f.write_str(name)
    }
}

/// A single requested output behavior.
///
/// `on_duration` and `off_duration` are in ticks of the timing primitive
/// (see [`crate::time`]). `cycles` is only read by [`CommandKind::Pulsed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub kind: CommandKind,
    pub on_duration: Ticks,
    pub off_duration: Ticks,
    pub cycles: u32,
}

impl Command {
    /// Size of the encoded form produced by [`Command::to_bytes`].
    pub const WIRE_SIZE: usize = 16;

    /// Creates a command from all of its fields.
    #[inline]
    pub const fn new(kind: CommandKind, on_duration: Ticks, off_duration: Ticks, cycles: u32) -> Self {
        Self {
            kind,
            on_duration,
            off_duration,
            cycles,
        }
    }

    pub const fn switch_off() -> Self {
        Self::new(CommandKind::SwitchOff, 0, 0, 0)
    }

    pub const fn switch_on() -> Self {
        Self::new(CommandKind::SwitchOn, 0, 0, 0)
    }

    /// Output low for `off` ticks, then back to the steady state.
    pub const fn continuous_off(off: Ticks) -> Self {
        Self::new(CommandKind::ContinuousOff, 0, off, 0)
    }

    /// Output high for `on` ticks, then back to the steady state.
    pub const fn continuous_on(on: Ticks) -> Self {
        Self::new(CommandKind::ContinuousOn, on, 0, 0)
    }

    /// A burst of `cycles` pulses, each `on` ticks high and `off` ticks low.
    pub const fn pulsed(on: Ticks, off: Ticks, cycles: u32) -> Self {
        Self::new(CommandKind::Pulsed, on, off, cycles)
    }

    /// Endless toggling, `on` ticks high and `off` ticks low.
    pub const fn pulsed_perpetual(on: Ticks, off: Ticks) -> Self {
        Self::new(CommandKind::PulsedPerpetual, on, off, 0)
    }

    /// Encodes the command as four little-endian `u32`s in
    /// `kind, on_duration, off_duration, cycles` order.
    pub fn to_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        let raw = RawCommand::from(*self);
        let mut bytes = [0u8; Self::WIRE_SIZE];
        for (chunk, field) in bytes
            .chunks_exact_mut(4)
            .zip([raw.kind, raw.on_duration, raw.off_duration, raw.cycles])
        {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        bytes
    }

    /// Decodes the form produced by [`Command::to_bytes`].
    pub fn from_bytes(bytes: &[u8; Self::WIRE_SIZE]) -> Self {
        let field = |i: usize| {
            u32::from_le_bytes([bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]])
        };
        RawCommand {
            kind: field(0),
            on_duration: field(1),
            off_duration: field(2),
            cycles: field(3),
        }
        .into()
    }
}

/// Fixed C layout of a command for crossing language or link boundaries.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawCommand {
    pub kind: u32,
    pub on_duration: u32,
    pub off_duration: u32,
    pub cycles: u32,
}

impl From<Command> for RawCommand {
    fn from(cmd: Command) -> Self {
        Self {
            kind: cmd.kind.as_raw(),
            on_duration: cmd.on_duration,
            off_duration: cmd.off_duration,
            cycles: cmd.cycles,
        }
    }
}

impl From<RawCommand> for Command {
    fn from(raw: RawCommand) -> Self {
        Self {
            kind: CommandKind::from_raw(raw.kind),
            on_duration: raw.on_duration,
            off_duration: raw.off_duration,
            cycles: raw.cycles,
        }
    }
}
