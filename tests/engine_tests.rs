//! Integration tests for Engine

mod common;
use common::*;

use futures_lite::future::block_on;
use periodic_output::{Command, CommandKind, Engine, Timeout};

#[test]
fn switch_on_drives_output_high_without_delay() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    assert!(block_on(engine.step(Some(Command::switch_on()), &mut delay)));

    assert_eq!(engine.output().history(), &[true]);
    assert!(delay.delays().is_empty());
    assert!(engine.output_state());
    assert_eq!(engine.current(), Command::switch_on());
    assert_eq!(engine.previous(), Command::switch_off());
}

#[test]
fn switch_off_drives_output_low() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    block_on(engine.step(Some(Command::switch_off()), &mut delay));

    assert_eq!(engine.output().history(), &[true, false]);
    assert!(!engine.output_state());
    assert_eq!(engine.previous(), Command::switch_on());
}

#[test]
fn pulsed_burst_from_switch_on_restores_high_output() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    engine.output_mut().clear();

    block_on(engine.step(Some(Command::pulsed(2, 3, 4)), &mut delay));

    assert_eq!(
        engine.output().history(),
        &[true, false, true, false, true, false, true, false, true]
    );
    assert_eq!(delay.delays(), &[2, 3, 2, 3, 2, 3, 2, 3]);
    assert_eq!(engine.current(), Command::switch_on());
    assert!(engine.output_state());
}

#[test]
fn pulsed_with_zero_cycles_only_restores_output() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    engine.output_mut().clear();

    block_on(engine.step(Some(Command::pulsed(2, 3, 0)), &mut delay));

    assert_eq!(engine.output().history(), &[true]);
    assert!(delay.delays().is_empty());
    assert_eq!(engine.current(), Command::switch_on());
}

#[test]
fn continuous_on_from_switch_off_returns_low() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::continuous_on(4)), &mut delay));

    assert_eq!(engine.output().history(), &[true, false]);
    assert_eq!(delay.delays(), &[4]);
    assert_eq!(engine.current(), Command::switch_off());
    assert!(!engine.output_state());
}

#[test]
fn continuous_off_from_switch_on_returns_high() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    engine.output_mut().clear();

    block_on(engine.step(Some(Command::continuous_off(6)), &mut delay));

    assert_eq!(engine.output().history(), &[false, true]);
    assert_eq!(delay.delays(), &[6]);
    assert_eq!(engine.current(), Command::switch_on());
}

#[test]
fn continuous_on_ignores_off_duration() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    let cmd = Command::new(CommandKind::ContinuousOn, 4, 99, 7);
    block_on(engine.step(Some(cmd), &mut delay));

    assert_eq!(delay.delays(), &[4]);
}

#[test]
fn pulsed_perpetual_toggles_with_phase_durations() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::pulsed_perpetual(5, 7)), &mut delay));
    for _ in 0..5 {
        assert_eq!(engine.wait_timeout(), Timeout::Immediate);
        block_on(engine.step(None, &mut delay));
    }

    assert_eq!(
        engine.output().history(),
        &[true, false, true, false, true, false]
    );
    assert_eq!(delay.delays(), &[5, 7, 5, 7, 5, 7]);
    assert_eq!(engine.current(), Command::pulsed_perpetual(5, 7));
}

#[test]
fn repeated_switch_on_is_a_no_op() {
    let log = HookLog::new();
    let mut engine = Engine::new(MockOutput::new()).with_debug_hook(log.hook());
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    let previous = engine.previous();
    let outputs = engine.output().history().len();

    assert!(!block_on(engine.step(Some(Command::switch_on()), &mut delay)));

    assert_eq!(log.count(), 1);
    assert_eq!(engine.previous(), previous);
    assert_eq!(engine.output().history().len(), outputs);
}

#[test]
fn initial_switch_off_is_debounced() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    assert!(!block_on(engine.step(Some(Command::switch_off()), &mut delay)));
    assert!(engine.output().history().is_empty());
}

#[test]
fn repeated_pulsed_perpetual_does_not_restart_toggling() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::pulsed_perpetual(5, 7)), &mut delay));
    assert!(!block_on(
        engine.step(Some(Command::pulsed_perpetual(5, 7)), &mut delay)
    ));
    block_on(engine.step(None, &mut delay));

    // The phase continues from where it was: on, then off.
    assert_eq!(engine.output().history(), &[true, false]);
    assert_eq!(engine.previous(), Command::switch_off());
}

#[test]
fn transient_commands_rearm_when_repeated() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::continuous_on(4)), &mut delay));
    block_on(engine.step(Some(Command::continuous_on(4)), &mut delay));

    assert_eq!(engine.output().history(), &[true, false, true, false]);
    assert_eq!(delay.delays(), &[4, 4]);
}

#[test]
fn transient_during_perpetual_toggle_resumes_toggling() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::pulsed_perpetual(5, 7)), &mut delay));
    assert!(engine.output_state());
    engine.output_mut().clear();

    block_on(engine.step(Some(Command::continuous_off(3)), &mut delay));

    // Restores the toggle's current level, then toggling carries on.
    assert_eq!(engine.output().history(), &[false, true]);
    assert_eq!(engine.current(), Command::pulsed_perpetual(5, 7));
    assert_eq!(engine.wait_timeout(), Timeout::Immediate);

    block_on(engine.step(None, &mut delay));
    assert_eq!(engine.output().last(), Some(false));
}

#[test]
fn debug_hook_fires_only_on_accepted_transitions() {
    let log = HookLog::new();
    let mut engine = Engine::new(MockOutput::new()).with_debug_hook(log.hook());
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    block_on(engine.step(Some(Command::pulsed(1, 1, 2)), &mut delay));
    block_on(engine.step(Some(Command::switch_on()), &mut delay));

    // Resumption back to SwitchOn and the debounced SwitchOn are silent.
    assert_eq!(
        log.messages(),
        vec!["SwitchOff -> SwitchOn".to_string(), "SwitchOn -> Pulsed".to_string()]
    );
}

#[test]
fn resumption_leaves_previous_pointing_at_resumed_command() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    block_on(engine.step(Some(Command::pulsed(1, 1, 1)), &mut delay));

    assert_eq!(engine.current(), Command::switch_on());
    assert_eq!(engine.previous(), Command::switch_on());
}

#[test]
fn wire_decoded_unknown_kind_behaves_as_switch_off() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));

    let mut bytes = Command::switch_on().to_bytes();
    bytes[0] = 0xFF;
    block_on(engine.step(Some(Command::from_bytes(&bytes)), &mut delay));

    assert_eq!(engine.output().last(), Some(false));
    assert_eq!(engine.current().kind, CommandKind::SwitchOff);
}

#[test]
fn snapshot_reflects_engine_state() {
    let mut engine = engine();
    let mut delay = RecordingDelay::new();

    block_on(engine.step(Some(Command::switch_on()), &mut delay));
    let snapshot = engine.snapshot();

    assert!(snapshot.output_state);
    assert_eq!(snapshot.current, Command::switch_on());
    assert_eq!(snapshot.previous, Command::switch_off());
}
