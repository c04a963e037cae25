//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit tests, integration tests and the desktop simulator.

#![cfg(any(test, feature = "std"))]

use crate::gpio::GpioBank;

/// Maximum number of scripted reads queued in a [`MockGpio`].
pub const MOCK_SCRIPT_DEPTH: usize = 256;

/// Error produced by a scripted [`MockGpio`] read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scripted GPIO read failure")]
pub struct MockGpioError;

/// Scripted GPIO bank
///
/// Each `read_all` pops the next scripted result. Once the script runs dry
/// the last successfully read bank is repeated, which models pins that
/// simply stay where they are.
pub struct MockGpio {
    script: heapless::Deque<Result<u32, MockGpioError>, MOCK_SCRIPT_DEPTH>,
    last: u32,
    reads: usize,
}

impl MockGpio {
    /// Create a mock whose pins idle at `idle`.
    pub fn new(idle: u32) -> Self {
        Self {
            script: heapless::Deque::new(),
            last: idle,
            reads: 0,
        }
    }

    /// Queue one successful read.
    ///
    /// Returns the level back if the script is full.
    pub fn push(&mut self, bank: u32) -> Result<(), u32> {
        self.script.push_back(Ok(bank)).map_err(|_| bank)
    }

    /// Queue every level in `banks`, stopping at the first one that does not fit.
    ///
    /// Returns how many were queued.
    pub fn extend(&mut self, banks: &[u32]) -> usize {
        banks
            .iter()
            .take_while(|&&bank| self.push(bank).is_ok())
            .count()
    }

    /// Queue one failing read.
    pub fn push_error(&mut self) -> Result<(), MockGpioError> {
        self.script
            .push_back(Err(MockGpioError))
            .map_err(|_| MockGpioError)
    }

    /// Number of scripted reads not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Total number of `read_all` calls so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GpioBank for MockGpio {
    type Error = MockGpioError;

    fn read_all(&mut self) -> Result<u32, Self::Error> {
        self.reads = self.reads.wrapping_add(1);
        match self.script.pop_front() {
            Some(Ok(bank)) => {
                self.last = bank;
                Ok(bank)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last),
        }
    }
}
