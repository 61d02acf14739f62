//! TelemetryPublisher: forwards subscribed readings to a sink.

use crate::output::{OutputError, TelemetrySink};
use crate::reading::{readings, Channels, DEFAULT_CHANNELS};
use heater_proto::Telemetry;

/// Publishes telemetry snapshots to a sink on the caller's schedule.
///
/// Only the subscribed [`Channels`] are read from the snapshot; the rest
/// are skipped entirely.
pub struct TelemetryPublisher<O> {
    sink: O,
    channels: Channels,
}

impl<O: TelemetrySink> TelemetryPublisher<O> {
    /// Create a publisher that forwards every channel.
    pub fn new(sink: O) -> Self {
        Self::with_channels(sink, DEFAULT_CHANNELS)
    }

    /// Create a publisher for a subset of channels.
    pub fn with_channels(sink: O, channels: Channels) -> Self {
        Self { sink, channels }
    }

    /// Send each subscribed reading of `telemetry` to the sink, in publish
    /// order.
    ///
    /// Returns the number of readings sent. Nothing is sent while the sink
    /// is not ready; the first sink error stops the rest of this snapshot.
    pub async fn publish(&mut self, telemetry: &Telemetry) -> Result<usize, OutputError> {
        if !self.sink.is_ready() {
            trace!("Sink not ready, skipping publish");
            return Ok(0);
        }

        let mut sent = 0;
        for reading in readings(telemetry, self.channels) {
            self.sink.publish(&reading).await?;
            sent += 1;
        }
        Ok(sent)
    }

    /// Subscribed channels.
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Change the subscribed channels.
    pub fn set_channels(&mut self, channels: Channels) {
        self.channels = channels;
    }

    /// Get a reference to the sink.
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Get a mutable reference to the sink.
    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    /// Decompose the publisher into its sink.
    pub fn into_sink(self) -> O {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::reading::{Channel, Reading};
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use heater_proto::FrameBuilder;
    use std::vec::Vec;

    // Simple mock sink
    struct MockSink {
        sent: Vec<Reading>,
        ready: bool,
        fail_after: Option<usize>,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                ready: true,
                fail_after: None,
            }
        }
    }

    impl TelemetrySink for MockSink {
        fn publish(&mut self, reading: &Reading) -> impl Future<Output = Result<(), OutputError>> {
            let result = match self.fail_after {
                Some(n) if self.sent.len() >= n => Err(OutputError::Io),
                _ => {
                    self.sent.push(*reading);
                    Ok(())
                }
            };
            core::future::ready(result)
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
        }
    }

    fn running_telemetry() -> Telemetry {
        Telemetry::from_frame(
            &FrameBuilder::new()
                .set_temperature(19)
                .run_state(5)
                .error_code(0)
                .heater_on(true)
                .build(),
        )
    }

    #[test]
    fn test_publishes_all_channels_in_order() {
        let mut publisher = TelemetryPublisher::new(MockSink::new());
        let sent = block_on(publisher.publish(&running_telemetry())).unwrap();

        assert_eq!(sent, 12);
        let channels: Vec<Channel> = publisher.sink().sent.iter().map(Reading::channel).collect();
        assert_eq!(channels, Channel::ALL);
        assert_eq!(publisher.sink().sent[0], Reading::SetTemperature(19));
        assert_eq!(publisher.sink().sent[8], Reading::RunState("Running"));
        assert_eq!(publisher.sink().sent[9], Reading::ErrorCode("No Error"));
        assert_eq!(publisher.sink().sent[10], Reading::HeaterOn(true));
    }

    #[test]
    fn test_publishes_subset() {
        let mut publisher = TelemetryPublisher::with_channels(
            MockSink::new(),
            Channels::HEATER_ON | Channels::SET_TEMPERATURE,
        );
        let sent = block_on(publisher.publish(&running_telemetry())).unwrap();

        assert_eq!(sent, 2);
        assert_eq!(
            publisher.sink().sent,
            [Reading::SetTemperature(19), Reading::HeaterOn(true)]
        );
    }

    #[test]
    fn test_no_channels_publishes_nothing() {
        let mut publisher = TelemetryPublisher::with_channels(MockSink::new(), Channels::NONE);
        assert_eq!(block_on(publisher.publish(&running_telemetry())), Ok(0));
        assert!(publisher.sink().sent.is_empty());
    }

    #[test]
    fn test_skips_when_not_ready() {
        let mut sink = MockSink::new();
        sink.ready = false;
        let mut publisher = TelemetryPublisher::new(sink);
        assert_eq!(block_on(publisher.publish(&running_telemetry())), Ok(0));
        assert!(publisher.sink().sent.is_empty());
    }

    #[test]
    fn test_stops_on_sink_error() {
        let mut sink = MockSink::new();
        sink.fail_after = Some(3);
        let mut publisher = TelemetryPublisher::new(sink);
        assert_eq!(
            block_on(publisher.publish(&running_telemetry())),
            Err(OutputError::Io)
        );
        assert_eq!(publisher.sink().sent.len(), 3);
    }

    #[test]
    fn test_unknown_snapshot_is_published() {
        let mut publisher =
            TelemetryPublisher::with_channels(MockSink::new(), Channels::RUN_STATE);
        block_on(publisher.publish(&Telemetry::unknown())).unwrap();
        assert_eq!(publisher.sink().sent, [Reading::RunState("Unknown")]);
    }

    #[test]
    fn test_set_channels() {
        let mut publisher = TelemetryPublisher::new(MockSink::new());
        publisher.set_channels(Channels::FAN_SPEED);
        assert_eq!(publisher.channels(), Channels::FAN_SPEED);
        assert_eq!(block_on(publisher.publish(&running_telemetry())), Ok(1));
    }
}
