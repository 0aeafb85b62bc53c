//! Test utilities and helper functions

use crate::common::mock_interface::MockBus;
use mcf8316a::{I2cInterface, Mcf8316aDriver};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Driver type used throughout the tests
pub type MockDriver = Mcf8316aDriver<MockBus, MockDelay>;

/// Driver type with a captured debug sink
pub type DebugDriver = Mcf8316aDriver<MockBus, MockDelay, SharedLog>;

/// Mock delay that only accumulates the requested time
///
/// Clones share the counters, so tests can inspect the time the driver
/// asked for.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
    ms_calls: Rc<RefCell<Vec<u32>>>,
    us_calls: Rc<RefCell<Vec<u32>>>,
}

impl MockDelay {
    /// Create a delay with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Total delay requested, in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.total_ns.get() / 1_000_000
    }

    /// Arguments of every `delay_ms` call
    pub fn ms_calls(&self) -> Vec<u32> {
        self.ms_calls.borrow().clone()
    }

    /// Arguments of every `delay_us` call
    pub fn us_calls(&self) -> Vec<u32> {
        self.us_calls.borrow().clone()
    }

    fn add_ns(&self, ns: u64) {
        self.total_ns.set(self.total_ns.get() + ns);
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.add_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.us_calls.borrow_mut().push(us);
        self.add_ns(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.borrow_mut().push(ms);
        self.add_ns(u64::from(ms) * 1_000_000);
    }
}

/// Debug sink collecting output into a shared string
#[derive(Debug, Clone, Default)]
pub struct SharedLog(Rc<RefCell<String>>);

impl SharedLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.0.borrow().clone()
    }

    /// Discard everything written so far
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().lines().map(str::to_owned).collect()
    }
}

impl fmt::Write for SharedLog {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.borrow_mut().push_str(s);
        Ok(())
    }
}

/// Create a mock driver for testing
/// Returns (driver, bus) where bus is a clone that shares state with the driver
pub fn create_mock_driver() -> (MockDriver, MockBus) {
    let (driver, bus, _) = create_mock_driver_with_delay();
    (driver, bus)
}

/// Create a mock driver and keep handles on both the bus and the delay
pub fn create_mock_driver_with_delay() -> (MockDriver, MockBus, MockDelay) {
    let bus = MockBus::new();
    let delay = MockDelay::new();
    let interface = I2cInterface::default(bus.clone(), delay.clone());
    let driver = Mcf8316aDriver::new(interface).expect("Failed to create mock driver");
    bus.clear_operations();
    (driver, bus, delay)
}

/// Create a mock driver with a debug sink attached
pub fn create_debug_driver() -> (DebugDriver, MockBus, SharedLog) {
    let bus = MockBus::new();
    let log = SharedLog::new();
    let interface = I2cInterface::default(bus.clone(), MockDelay::new()).with_debug(log.clone());
    let driver = Mcf8316aDriver::new(interface).expect("Failed to create mock driver");
    bus.clear_operations();
    (driver, bus, log)
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
