//! Platform-agnostic heater telemetry monitor, byte-source and sink traits.
//!
//! This crate sits between a serial byte source and whatever consumes the
//! heater's telemetry. It has no platform-specific dependencies and can be
//! used both in embedded `no_std` firmware and on host for testing.
//!
//! # Overview
//!
//! - [`input`]: Byte source trait ([`ByteSource`]) and adapters
//! - [`output`]: Telemetry sink trait ([`TelemetrySink`])
//! - [`monitor`]: Drains a source through the frame synchronizer ([`HeaterMonitor`])
//! - [`reading`]: Published channels and values ([`Channels`], [`Reading`])
//! - [`publisher`]: Forwards subscribed readings to a sink ([`TelemetryPublisher`])
//!
//! # Example
//!
//! ```rust
//! use heater_core::{HeaterMonitor, SliceSource};
//! use heater_proto::FrameBuilder;
//!
//! let frame = FrameBuilder::new().run_state(5).build();
//! let mut monitor = HeaterMonitor::new(SliceSource::new(frame.as_bytes()));
//!
//! let summary = monitor.poll().unwrap();
//! assert_eq!(summary.frames_decoded, 1);
//! assert_eq!(monitor.telemetry().run_state_description(), "Running");
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//! - **`log`**: Log through the `log` facade instead
//! - **`embedded-io`**: Enable [`IoByteSource`] for `embedded-io` readers
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This must go first so the logging macros are visible to the other modules.
mod fmt;

pub mod input;
pub mod monitor;
pub mod output;
pub mod publisher;
pub mod reading;

// Re-export main types at crate root
#[cfg(feature = "embedded-io")]
pub use input::IoByteSource;
pub use input::{ByteSource, InputError, SliceSource};
pub use monitor::{HeaterMonitor, MonitorStats, PollSummary};
pub use output::{OutputError, TelemetrySink};
pub use publisher::TelemetryPublisher;
pub use reading::{readings, Channel, Channels, Reading, DEFAULT_CHANNELS};

pub use heater_proto::{ErrorCode, RunState, Telemetry};
