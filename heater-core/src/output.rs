//! Telemetry sink trait and error types.

use crate::reading::Reading;
use core::future::Future;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Transport I/O error.
    Io,
    /// Sink not ready to accept data.
    NotReady,
    /// Formatted reading did not fit the sink's buffer.
    BufferFull,
}

/// Async trait for telemetry sinks.
///
/// A sink receives one [`Reading`] at a time on the publisher's schedule,
/// independent of when frames arrive. Implementations might log values,
/// write them to a serial port, or update entities on a home automation
/// bus.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait TelemetrySink {
    /// Forward one reading.
    fn publish(&mut self, reading: &Reading) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the sink is ready to accept data.
    fn is_ready(&self) -> bool {
        true
    }
}
