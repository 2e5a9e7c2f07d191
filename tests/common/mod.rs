//! Shared test infrastructure for periodic-output integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use periodic_output::{Engine, Output, TickDelay, Ticks};

// ============================================================================
// Mock Output
// ============================================================================

/// Mock output that records every level it is driven to
pub struct MockOutput {
    history: heapless::Vec<bool, 64>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            history: heapless::Vec::new(),
        }
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }

    pub fn last(&self) -> Option<bool> {
        self.history.last().copied()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Output for MockOutput {
    fn set(&mut self, on: bool) {
        let _ = self.history.push(on);
    }
}

// ============================================================================
// Recording Delay
// ============================================================================

/// Delay that returns immediately and records each requested tick count
pub struct RecordingDelay {
    delays: heapless::Vec<Ticks, 64>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self {
            delays: heapless::Vec::new(),
        }
    }

    pub fn delays(&self) -> &[Ticks] {
        &self.delays
    }

    pub fn clear(&mut self) {
        self.delays.clear();
    }
}

impl TickDelay for RecordingDelay {
    async fn delay_ticks(&mut self, ticks: Ticks) {
        let _ = self.delays.push(ticks);
    }
}

// ============================================================================
// Recording Debug Hook
// ============================================================================

/// Collects debug hook messages; clone it into the hook closure
#[derive(Clone, Default)]
pub struct HookLog {
    messages: Rc<RefCell<Vec<String>>>,
}

impl HookLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure suitable for `Engine::with_debug_hook`
    pub fn hook(&self) -> impl FnMut(&str) + use<> {
        let messages = Rc::clone(&self.messages);
        move |message: &str| messages.borrow_mut().push(message.to_owned())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }
}

// ============================================================================
// Thread-safe Output
// ============================================================================

/// Output that can be observed from the test thread while a worker drives it
#[derive(Clone, Default)]
pub struct SharedOutput {
    history: Arc<Mutex<Vec<bool>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<bool> {
        self.history.lock().unwrap().last().copied()
    }

    pub fn len(&self) -> usize {
        self.history.lock().unwrap().len()
    }
}

impl Output for SharedOutput {
    fn set(&mut self, on: bool) {
        self.history.lock().unwrap().push(on);
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Engine with a recording output and no debug hook
pub fn engine() -> Engine<MockOutput> {
    Engine::new(MockOutput::new())
}

/// Polls `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
